use mng_wire::{ChunkTag, Flavor};

use crate::chunk::Chunk;

/// Stable handle to a record inside one [`ChunkDocument`].
///
/// Handles stay valid while the record is in the document. Once the
/// record is removed its slot may be reused, and the old handle stops
/// resolving because the slot generation has moved on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    chunk: Chunk,
    prev: Option<ChunkId>,
    next: Option<ChunkId>,
    sequence: u64,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Ordered chunk records of one stream.
///
/// An index arena with doubly linked records:
///
/// ```text
///  head                                     tail
///   │                                         │
///   ▼                                         ▼
/// ┌──────┐ next ┌──────┐ next ┌──────┐ next ┌──────┐
/// │ MHDR │─────▶│ TERM │─────▶│ IHDR │─ ─ ─▶│ MEND │
/// │ seq 0│◀─────│ seq 1│◀─────│ seq 2│◀─ ─ ─│ seq n│
/// └──────┘ prev └──────┘ prev └──────┘ prev └──────┘
/// ```
///
/// Records are appended at the tail only. Each append takes the next
/// sequence number; numbers are never reused, so they keep identifying
/// a record after earlier ones were removed by a streaming write.
///
/// The first record ever appended fixes the flavor (IHDR → PNG,
/// JHDR → JNG, anything else → MNG). Until then the flavor falls back to
/// the signature the decoder saw, if any.
#[derive(Debug, Default)]
pub struct ChunkDocument {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<ChunkId>,
    tail: Option<ChunkId>,
    len: usize,
    next_sequence: u64,
    first_tag: Option<ChunkTag>,
    signature: Option<Flavor>,
    complete: bool,
}

impl ChunkDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn first(&self) -> Option<ChunkId> {
        self.head
    }

    #[must_use]
    pub fn last(&self) -> Option<ChunkId> {
        self.tail
    }

    /// The record behind `id`, if it is still in this document.
    #[must_use]
    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        self.node(id).map(|n| &n.chunk)
    }

    #[must_use]
    pub fn next(&self, id: ChunkId) -> Option<ChunkId> {
        self.node(id).and_then(|n| n.next)
    }

    #[must_use]
    pub fn prev(&self, id: ChunkId) -> Option<ChunkId> {
        self.node(id).and_then(|n| n.prev)
    }

    #[must_use]
    pub fn sequence_of(&self, id: ChunkId) -> Option<u64> {
        self.node(id).map(|n| n.sequence)
    }

    /// Tag of the first record ever appended, even if it was removed since.
    #[must_use]
    pub fn first_tag(&self) -> Option<ChunkTag> {
        self.first_tag
    }

    /// PNG, JNG or MNG, from the first record or else the signature.
    #[must_use]
    pub fn flavor(&self) -> Option<Flavor> {
        self.first_tag
            .map(Flavor::from_first_chunk)
            .or(self.signature)
    }

    /// The signature read from the stream or declared by the host.
    #[must_use]
    pub fn signature(&self) -> Option<Flavor> {
        self.signature
    }

    pub fn set_signature(&mut self, flavor: Flavor) {
        self.signature = Some(flavor);
    }

    /// Whether the stream this document came from ended cleanly.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Sequence number the next append will take.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Link `chunk` at the tail.
    pub fn append(&mut self, chunk: Chunk) -> ChunkId {
        let tag = chunk.tag();
        if self.first_tag.is_none() {
            self.first_tag = Some(tag);
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let node = Node {
            chunk,
            prev: self.tail,
            next: None,
            sequence,
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                ChunkId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ChunkId {
                    index,
                    generation: 0,
                }
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(n) = self.node_mut(tail) {
                    n.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
        tracing::trace!(%tag, sequence, "chunk appended");
        id
    }

    /// Unlink and return the record behind `id`.
    pub fn remove(&mut self, id: ChunkId) -> Option<Chunk> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        match node.prev {
            Some(prev) => {
                if let Some(n) = self.node_mut(prev) {
                    n.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(n) = self.node_mut(next) {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
        self.len -= 1;
        tracing::trace!(tag = %node.chunk.tag(), sequence = node.sequence, "chunk removed");
        Some(node.chunk)
    }

    pub fn pop_front(&mut self) -> Option<Chunk> {
        let head = self.head?;
        self.remove(head)
    }

    /// Drop every record and reset to an empty document.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Append a deep copy of `source`'s record `id`.
    ///
    /// Returns `None` when `id` does not resolve in `source`.
    pub fn copy_chunk(&mut self, source: &ChunkDocument, id: ChunkId) -> Option<ChunkId> {
        let chunk = source.get(id)?.clone();
        Some(self.append(chunk))
    }

    /// Visit records in order starting at sequence number `start`, until
    /// `visit` returns `false`.
    ///
    /// # Returns
    ///
    /// The number of records visited.
    pub fn iterate_chunks<F>(&self, start: u64, mut visit: F) -> usize
    where
        F: FnMut(ChunkId, &Chunk, u64) -> bool,
    {
        let mut visited = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.node(id) else { break };
            cursor = node.next;
            if node.sequence < start {
                continue;
            }
            visited += 1;
            if !visit(id, &node.chunk, node.sequence) {
                break;
            }
        }
        visited
    }

    /// Records in order, with their handles.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            doc: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    pub fn chunks(&self) -> impl DoubleEndedIterator<Item = &Chunk> {
        self.iter().map(|(_, chunk)| chunk)
    }

    pub fn tags(&self) -> impl Iterator<Item = ChunkTag> + '_ {
        self.chunks().map(Chunk::tag)
    }

    fn node(&self, id: ChunkId) -> Option<&Node> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: ChunkId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}

impl PartialEq for ChunkDocument {
    /// Two documents are equal when they hold equal records in the same
    /// order and agree on the flavor. Handles and sequence numbers are
    /// not compared.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.flavor() == other.flavor()
            && self.chunks().eq(other.chunks())
    }
}

impl Clone for ChunkDocument {
    /// Compacts the arena: the clone has no free slots, so handles from
    /// the original do not resolve in it. Sequence numbers carry over,
    /// including the next one to be assigned.
    fn clone(&self) -> Self {
        let mut copy = Self {
            first_tag: self.first_tag,
            signature: self.signature,
            complete: self.complete,
            ..Self::default()
        };
        for (id, chunk) in self.iter() {
            let copied = copy.append(chunk.clone());
            if let (Some(sequence), Some(node)) = (self.sequence_of(id), copy.node_mut(copied)) {
                node.sequence = sequence;
            }
        }
        copy.next_sequence = self.next_sequence;
        copy
    }
}

impl Extend<Chunk> for ChunkDocument {
    fn extend<I: IntoIterator<Item = Chunk>>(&mut self, iter: I) {
        for chunk in iter {
            self.append(chunk);
        }
    }
}

impl FromIterator<Chunk> for ChunkDocument {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut doc = Self::new();
        doc.extend(iter);
        doc
    }
}

/// Forward and backward walk over a document.
#[derive(Clone, Debug)]
pub struct Iter<'d> {
    doc: &'d ChunkDocument,
    front: Option<ChunkId>,
    back: Option<ChunkId>,
    remaining: usize,
}

impl<'d> Iterator for Iter<'d> {
    type Item = (ChunkId, &'d Chunk);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = self.doc.node(id)?;
        self.front = node.next;
        self.remaining -= 1;
        Some((id, &node.chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = self.doc.node(id)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((id, &node.chunk))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'d> IntoIterator for &'d ChunkDocument {
    type Item = (ChunkId, &'d Chunk);
    type IntoIter = Iter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ihdr::Ihdr;
    use crate::image_data::ImageData;
    use crate::jhdr::Jhdr;
    use crate::mhdr::Mhdr;
    use crate::raw::RawChunk;

    fn png_doc() -> ChunkDocument {
        [
            Chunk::Ihdr(Ihdr::rgba8(1, 1)),
            Chunk::Idat(ImageData::new(vec![1])),
            Chunk::Idat(ImageData::new(vec![2])),
            Chunk::Iend,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn new_document_is_empty() {
        let doc = ChunkDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.first(), None);
        assert_eq!(doc.last(), None);
        assert_eq!(doc.flavor(), None);
        assert_eq!(doc.iter().count(), 0);
    }

    #[test]
    fn forward_and_backward_walks_agree() {
        let doc = png_doc();
        let forward: Vec<ChunkTag> = doc.tags().collect();
        let mut backward: Vec<ChunkTag> = doc.chunks().rev().map(Chunk::tag).collect();
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            [ChunkTag::IHDR, ChunkTag::IDAT, ChunkTag::IDAT, ChunkTag::IEND]
        );

        let mut cursor = doc.first();
        let mut hops = 0;
        while let Some(id) = cursor {
            cursor = doc.next(id);
            hops += 1;
        }
        assert_eq!(hops, doc.len());
        let last = doc.last().unwrap();
        assert_eq!(doc.next(last), None);
        assert_eq!(doc.get(last), Some(&Chunk::Iend));
    }

    #[test]
    fn flavor_from_first_chunk() {
        assert_eq!(png_doc().flavor(), Some(Flavor::Png));

        let jng: ChunkDocument = [Chunk::Jhdr(Jhdr::color8(1, 1))].into_iter().collect();
        assert_eq!(jng.flavor(), Some(Flavor::Jng));

        let mut mng = ChunkDocument::new();
        mng.set_signature(Flavor::Png);
        assert_eq!(mng.flavor(), Some(Flavor::Png));
        mng.append(Chunk::Mhdr(Mhdr::new(1, 1, 1)));
        assert_eq!(mng.flavor(), Some(Flavor::Mng));
    }

    #[test]
    fn remove_relinks_neighbours() {
        let mut doc = png_doc();
        let second = doc.next(doc.first().unwrap()).unwrap();
        let removed = doc.remove(second).unwrap();
        assert_eq!(removed, Chunk::Idat(ImageData::new(vec![1])));
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get(second), None);
        assert_eq!(doc.remove(second), None);

        let tags: Vec<_> = doc.tags().collect();
        assert_eq!(tags, [ChunkTag::IHDR, ChunkTag::IDAT, ChunkTag::IEND]);
        let back: Vec<_> = doc.chunks().rev().map(Chunk::tag).collect();
        assert_eq!(back, [ChunkTag::IEND, ChunkTag::IDAT, ChunkTag::IHDR]);
    }

    #[test]
    fn stale_handle_does_not_resolve_after_reuse() {
        let mut doc = png_doc();
        let first = doc.first().unwrap();
        doc.pop_front().unwrap();
        let reused = doc.append(Chunk::Iend);
        assert_ne!(first, reused);
        assert_eq!(doc.get(first), None);
        assert_eq!(doc.get(reused), Some(&Chunk::Iend));
    }

    #[test]
    fn sequence_numbers_survive_removal() {
        let mut doc = png_doc();
        doc.pop_front();
        doc.pop_front();
        let seqs: Vec<u64> = doc.iter().filter_map(|(id, _)| doc.sequence_of(id)).collect();
        assert_eq!(seqs, [2, 3]);
        assert_eq!(doc.first_tag(), Some(ChunkTag::IHDR));
    }

    #[test]
    fn iterate_from_sequence_until_stop() {
        let doc = png_doc();
        let mut seen = Vec::new();
        let visited = doc.iterate_chunks(1, |_, chunk, seq| {
            seen.push((seq, chunk.tag()));
            seq < 2
        });
        assert_eq!(visited, 2);
        assert_eq!(seen, [(1, ChunkTag::IDAT), (2, ChunkTag::IDAT)]);
    }

    #[test]
    fn copy_between_documents_is_deep() {
        let source = png_doc();
        let mut target = ChunkDocument::new();
        let id = source.first().unwrap();
        let copied = target.copy_chunk(&source, id).unwrap();
        assert_eq!(target.get(copied), source.get(id));
        assert_eq!(target.flavor(), Some(Flavor::Png));
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn clone_and_equality() {
        let mut doc = png_doc();
        doc.append(Chunk::Unknown(RawChunk::new(ChunkTag::new(*b"prIv"), vec![0])));
        doc.pop_front();
        let copy = doc.clone();
        assert_eq!(copy, doc);
        assert_eq!(copy.first_tag(), Some(ChunkTag::IHDR));
        assert_eq!(copy.len(), 4);
    }

    #[test]
    fn clone_keeps_sequence_numbers() {
        let mut doc = png_doc();
        doc.pop_front();
        let copy = doc.clone();
        let original: Vec<_> = doc.iter().map(|(id, _)| doc.sequence_of(id)).collect();
        let cloned: Vec<_> = copy.iter().map(|(id, _)| copy.sequence_of(id)).collect();
        assert_eq!(original, [Some(1), Some(2), Some(3)]);
        assert_eq!(cloned, original);
        assert_eq!(copy.next_sequence(), doc.next_sequence());

        let mut seen = Vec::new();
        copy.iterate_chunks(2, |_, chunk, sequence| {
            seen.push((sequence, chunk.tag()));
            true
        });
        assert_eq!(seen, [(2, ChunkTag::IDAT), (3, ChunkTag::IEND)]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut doc = png_doc();
        doc.mark_complete();
        doc.clear();
        assert!(doc.is_empty());
        assert!(!doc.is_complete());
        assert_eq!(doc.first_tag(), None);
        assert_eq!(doc.next_sequence(), 0);
    }
}
