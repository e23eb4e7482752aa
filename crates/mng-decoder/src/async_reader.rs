use bytes::BytesMut;
use mng_types::ChunkDocument;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::config::DecoderConfig;
use crate::decoder::{MngDecoder, ReadStatus};
use crate::error::{DecodeError, Warning};
use crate::push::Ownership;

const READ_CHUNK: usize = 8192;

/// Drives an [`MngDecoder`] from any `tokio` async reader.
///
/// Each read is pushed into the decoder as one engine-owned range and
/// the decoder is resumed until it finishes. A zero-length read marks
/// the end of the stream. The decoder itself never touches the reader,
/// so backpressure comes from how fast the caller awaits.
///
/// # Example
///
/// ```rust,no_run
/// use mng_decoder::AsyncChunkReader;
///
/// async fn load(file: tokio::fs::File) {
///     let doc = AsyncChunkReader::new(file).read_document().await.unwrap();
///     println!("{} chunks", doc.len());
/// }
/// ```
pub struct AsyncChunkReader<R> {
    reader: R,
    decoder: MngDecoder,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> AsyncChunkReader<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    #[must_use]
    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            reader,
            decoder: MngDecoder::push_only_with_config(config),
            buf: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    /// Read until the decoder finishes and return the document.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Io`] from the reader.
    /// - Any error the decoder raises.
    pub async fn read_document(mut self) -> Result<ChunkDocument, DecodeError> {
        self.read_to_end().await?;
        Ok(self.decoder.into_document())
    }

    /// Like [`read_document`](Self::read_document), but keeps the decoder
    /// around so warnings can be inspected.
    ///
    /// # Errors
    ///
    /// Same as [`read_document`](Self::read_document).
    pub async fn read_to_end(&mut self) -> Result<&ChunkDocument, DecodeError> {
        let mut status = match self.decoder.read() {
            Err(DecodeError::AlreadyReading) if self.decoder.is_suspended() => {
                self.decoder.resume()?
            }
            other => other?,
        };
        while status == ReadStatus::NeedMoreData {
            self.buf.reserve(READ_CHUNK);
            let n = self.reader.read_buf(&mut self.buf).await?;
            if n == 0 {
                trace!("reader reached end of stream");
                self.decoder.push_end();
            } else {
                self.decoder
                    .push_data(self.buf.split().freeze(), Ownership::Engine);
            }
            status = self.decoder.resume()?;
        }
        Ok(self.decoder.document())
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        self.decoder.warnings()
    }

    #[must_use]
    pub fn decoder(&self) -> &MngDecoder {
        &self.decoder
    }
}
