//! Binary snapshot of a [`KmerIndex`].
//!
//! # Format
//!
//! ```text
//! header:  "KMIX" | version u8 | leaf_capacity u32 | max_prefix_len u8
//!          | root u32 | node_count u32
//! inner:   1u8 | flags u8 | [prefix kmer] | label_count u16
//!          | labels i16 * n | children u32 * n
//! leaf:    2u8 | entry_count u32 | (suffix kmer | row u32) * n
//! ```
//!
//! Integers are little-endian; k-mers use the length-prefixed layout of
//! [`crate::codec`]. Nodes are written in arena order so handles survive a
//! round trip unchanged.

use std::fs;
use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::info;

use crate::codec::{decode_kmer, encode_kmer, encoded_len};
use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::index::spgist::NodeLabel;
use crate::index::trie::{InnerNode, KmerIndex, LeafEntry, Node, NodeId};

/// File magic.
pub const MAGIC: &[u8; 4] = b"KMIX";
/// Current format version.
pub const VERSION: u8 = 1;

const TAG_INNER: u8 = 1;
const TAG_LEAF: u8 = 2;
const FLAG_HAS_PREFIX: u8 = 0b0000_0001;
const FLAG_ALL_THE_SAME: u8 = 0b0000_0010;

const HEADER_LEN: usize = 4 + 1 + 4 + 1 + 4 + 4;
// Smallest encoded node: a leaf tag plus an empty entry count.
const MIN_NODE_LEN: usize = 1 + 4;

impl KmerIndex {
    /// Serializes the index to a snapshot image.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.estimated_body_len());

        buf.put_slice(MAGIC);
        buf.put_u8(VERSION);
        buf.put_u32_le(self.config.leaf_capacity as u32);
        buf.put_u8(self.config.max_prefix_len as u8);
        buf.put_u32_le(self.root.as_u32());
        buf.put_u32_le(self.nodes.len() as u32);

        for node in &self.nodes {
            match node {
                Node::Inner(inner) => {
                    buf.put_u8(TAG_INNER);
                    let mut flags = 0;
                    if inner.prefix.is_some() {
                        flags |= FLAG_HAS_PREFIX;
                    }
                    if inner.all_the_same {
                        flags |= FLAG_ALL_THE_SAME;
                    }
                    buf.put_u8(flags);
                    if let Some(prefix) = &inner.prefix {
                        encode_kmer(prefix, &mut buf);
                    }
                    buf.put_u16_le(inner.labels.len() as u16);
                    for label in &inner.labels {
                        buf.put_i16_le(label.to_i16());
                    }
                    for child in &inner.children {
                        buf.put_u32_le(child.as_u32());
                    }
                }
                Node::Leaf(entries) => {
                    buf.put_u8(TAG_LEAF);
                    buf.put_u32_le(entries.len() as u32);
                    for entry in entries {
                        encode_kmer(&entry.suffix, &mut buf);
                        buf.put_u32_le(entry.row);
                    }
                }
            }
        }

        buf.freeze()
    }

    /// Rebuilds an index from a snapshot image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] if the image is truncated, carries an
    /// unknown magic, version or tag, holds an invalid symbol, label, handle
    /// or page budget, or decodes to a structure that fails
    /// [`check_invariants`](Self::check_invariants).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;
        need(&buf, HEADER_LEN, "header")?;

        let mut magic = [0u8; 4];
        buf.copy_to_slice(&mut magic);
        if &magic != MAGIC {
            return Err(Error::Corrupted(format!("bad magic {magic:?}")));
        }
        let version = buf.get_u8();
        if version != VERSION {
            return Err(Error::Corrupted(format!(
                "unsupported snapshot version {version}"
            )));
        }

        let config = IndexConfig {
            leaf_capacity: buf.get_u32_le() as usize,
            max_prefix_len: buf.get_u8() as usize,
        };
        config
            .validate()
            .map_err(|e| Error::Corrupted(e.to_string()))?;

        let root = buf.get_u32_le();
        let node_count = buf.get_u32_le() as usize;
        if node_count == 0 || root as usize >= node_count {
            return Err(Error::Corrupted(format!(
                "root {root} out of range for {node_count} nodes"
            )));
        }
        need(&buf, node_count.saturating_mul(MIN_NODE_LEN), "node table")?;

        let mut nodes = Vec::with_capacity(node_count);
        let mut len = 0usize;
        for position in 0..node_count {
            let node = decode_node(&mut buf, node_count)
                .map_err(|e| annotate(e, position))?;
            if let Node::Leaf(entries) = &node {
                len += entries.len();
            }
            nodes.push(node);
        }
        if buf.has_remaining() {
            return Err(Error::Corrupted(format!(
                "{} trailing bytes after node table",
                buf.remaining()
            )));
        }

        let index = Self {
            nodes,
            root: NodeId(root),
            config,
            len,
        };
        index.check_invariants().map_err(|e| match e {
            Error::Internal(msg) => Error::Corrupted(msg),
            other => other,
        })?;
        Ok(index)
    }

    /// Writes a snapshot to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes();
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;

        info!(
            path = %path.display(),
            bytes = bytes.len(),
            entries = self.len,
            "Index snapshot saved"
        );
        Ok(())
    }

    /// Reads a snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Corrupted`] if its content is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let index = Self::from_bytes(&bytes)?;

        info!(
            path = %path.display(),
            bytes = bytes.len(),
            entries = index.len,
            nodes = index.nodes.len(),
            "Index snapshot loaded"
        );
        Ok(index)
    }

    fn estimated_body_len(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Inner(inner) => {
                    2 + inner.prefix.as_ref().map_or(0, encoded_len) + 2 + inner.labels.len() * 6
                }
                Node::Leaf(entries) => {
                    MIN_NODE_LEN
                        + entries
                            .iter()
                            .map(|e| encoded_len(&e.suffix) + 4)
                            .sum::<usize>()
                }
            })
            .sum()
    }
}

fn decode_node(buf: &mut &[u8], node_count: usize) -> Result<Node> {
    need(buf, 1, "node tag")?;
    match buf.get_u8() {
        TAG_INNER => {
            need(buf, 1, "inner flags")?;
            let flags = buf.get_u8();
            if flags & !(FLAG_HAS_PREFIX | FLAG_ALL_THE_SAME) != 0 {
                return Err(Error::Corrupted(format!("unknown inner flags 0b{flags:08b}")));
            }
            let prefix = if flags & FLAG_HAS_PREFIX != 0 {
                let prefix = decode_kmer(buf)?;
                if prefix.is_empty() {
                    return Err(Error::Corrupted("empty stored prefix".to_string()));
                }
                Some(prefix)
            } else {
                None
            };

            need(buf, 2, "label count")?;
            let count = buf.get_u16_le() as usize;
            need(buf, count * 6, "labels and children")?;

            let mut labels = Vec::with_capacity(count);
            for _ in 0..count {
                let raw = buf.get_i16_le();
                let label = NodeLabel::from_i16(raw)
                    .ok_or_else(|| Error::Corrupted(format!("invalid label {raw}")))?;
                labels.push(label);
            }
            let mut children = Vec::with_capacity(count);
            for _ in 0..count {
                let child = buf.get_u32_le();
                if child as usize >= node_count {
                    return Err(Error::Corrupted(format!(
                        "child handle {child} out of range for {node_count} nodes"
                    )));
                }
                children.push(NodeId(child));
            }

            Ok(Node::Inner(InnerNode {
                prefix,
                labels,
                children,
                all_the_same: flags & FLAG_ALL_THE_SAME != 0,
            }))
        }
        TAG_LEAF => {
            need(buf, 4, "entry count")?;
            let count = buf.get_u32_le() as usize;
            // Each entry takes at least a length byte and a row id.
            need(buf, count.saturating_mul(5), "leaf entries")?;

            let mut entries = Vec::with_capacity(count);
            for _ in 0..count {
                let suffix = decode_kmer(buf)?;
                need(buf, 4, "row id")?;
                entries.push(LeafEntry {
                    suffix,
                    row: buf.get_u32_le(),
                });
            }
            Ok(Node::Leaf(entries))
        }
        tag => Err(Error::Corrupted(format!("unknown node tag {tag}"))),
    }
}

fn need(buf: &&[u8], len: usize, what: &str) -> Result<()> {
    if buf.remaining() < len {
        return Err(Error::Corrupted(format!(
            "truncated {what}: need {len} bytes, {} left",
            buf.remaining()
        )));
    }
    Ok(())
}

fn annotate(err: Error, position: usize) -> Error {
    match err {
        Error::Corrupted(msg) => Error::Corrupted(format!("node #{position}: {msg}")),
        other => other,
    }
}
