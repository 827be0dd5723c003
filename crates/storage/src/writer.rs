//! Streaming of a request body into a file in bounded parts

use crate::{Result, StorageError};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::pin;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Default part size (256 MiB); caps memory held per upload
pub const DEFAULT_PART_SIZE: usize = 256 * 1024 * 1024;

/// Copies exactly a declared number of bytes from a chunk stream to a writer,
/// buffering at most one part at a time.
#[derive(Debug, Clone, Copy)]
pub struct BodyWriter {
    part_size: usize,
}

impl Default for BodyWriter {
    fn default() -> Self {
        Self::new(DEFAULT_PART_SIZE)
    }
}

impl BodyWriter {
    pub fn new(part_size: usize) -> Self {
        Self {
            part_size: part_size.max(1),
        }
    }

    /// Number of parts needed for `declared` bytes
    pub fn part_count(&self, declared: u64) -> u64 {
        declared.div_ceil(self.part_size as u64)
    }

    /// Write `declared` bytes from `body` into `out`.
    ///
    /// Fails with [`StorageError::Incomplete`] if the stream ends early. Bytes
    /// beyond `declared` are left unread.
    pub async fn write<S, E, W>(&self, body: S, out: &mut W, declared: u64) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Display,
        W: AsyncWrite + Unpin,
    {
        let mut body = pin!(body);
        let parts = self.part_count(declared);
        let part_size = self.part_size as u64;

        let mut buf = BytesMut::with_capacity(declared.min(part_size) as usize);
        let mut leftover: Option<Bytes> = None;
        let mut written: u64 = 0;

        for part in 0..parts {
            let part_len = (declared - written).min(part_size) as usize;
            buf.clear();

            while buf.len() < part_len {
                let chunk = match leftover.take() {
                    Some(chunk) => chunk,
                    None => match body.next().await {
                        Some(Ok(chunk)) => chunk,
                        Some(Err(e)) => return Err(StorageError::Stream(e.to_string())),
                        None => {
                            return Err(StorageError::Incomplete {
                                expected: declared,
                                received: written + buf.len() as u64,
                            })
                        }
                    },
                };

                let needed = part_len - buf.len();
                if chunk.len() > needed {
                    buf.extend_from_slice(&chunk[..needed]);
                    leftover = Some(chunk.slice(needed..));
                } else {
                    buf.extend_from_slice(&chunk);
                }
            }

            out.write_all(&buf).await?;
            written += part_len as u64;
            debug!(part = part + 1, parts, bytes = part_len, "Wrote part");
        }

        out.flush().await?;
        Ok(written)
    }
}
