/// Opaque pixel data: IDAT, JDAT, JDAA and JdAA.
///
/// The bytes are compressed image data that only a pixel decoder can
/// interpret; this layer carries them unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageData {
    pub data: Vec<u8>,
}

impl ImageData {
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.data);
    }

    #[must_use]
    pub fn decode_body(buf: &[u8]) -> Self {
        Self { data: buf.to_vec() }
    }
}
