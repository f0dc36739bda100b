// src/exec/accumulate.rs

//! Per-channel output buffering.
//!
//! Each channel is drained by exactly one reader into its own buffer, so the
//! two channels never contend. Bytes are concatenated as they arrive and only
//! decoded once the channel is closed, which keeps multi-byte characters
//! intact when they straddle chunk boundaries.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::trace;

use crate::types::{Channel, Progress};

const CHUNK_SIZE: usize = 8 * 1024;

/// Optional observer receiving each chunk as it is buffered.
pub type ProgressSink = mpsc::UnboundedSender<Progress>;

/// Append-only byte buffer for one channel.
#[derive(Debug)]
pub struct ChannelBuffer {
    channel: Channel,
    bytes: Vec<u8>,
    progress: Option<ProgressSink>,
}

impl ChannelBuffer {
    pub fn new(channel: Channel, progress: Option<ProgressSink>) -> Self {
        Self {
            channel,
            bytes: Vec::new(),
            progress,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Append a chunk and notify the progress observer, if any.
    ///
    /// A closed observer is dropped silently; progress never affects the
    /// buffered result.
    pub fn push(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        self.bytes.extend_from_slice(chunk);
        trace!(channel = %self.channel, bytes = chunk.len(), total = self.bytes.len(), "chunk buffered");

        if let Some(tx) = &self.progress {
            let event = Progress {
                channel: self.channel,
                chunk: chunk.to_vec(),
            };
            if tx.send(event).is_err() {
                self.progress = None;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the whole buffer as UTF-8, replacing invalid sequences.
    pub fn into_text(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

/// Read `reader` to EOF, buffering every chunk.
///
/// `None` (the channel is not piped) yields an empty buffer.
pub async fn drain<R>(reader: Option<R>, mut buffer: ChannelBuffer) -> std::io::Result<ChannelBuffer>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(buffer);
    };

    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.push(&chunk[..n]);
    }

    trace!(channel = %buffer.channel(), total = buffer.len(), "channel closed");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn multibyte_split_across_chunks_decodes_once_joined() {
        let text = "héllo wörld ✓";
        let bytes = text.as_bytes();
        // Split inside the two-byte 'é'.
        let (a, b) = bytes.split_at(2);

        let mut buf = ChannelBuffer::new(Channel::Stdout, None);
        buf.push(a);
        buf.push(b);
        assert_eq!(buf.into_text(), text);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_dropped() {
        let mut buf = ChannelBuffer::new(Channel::Stderr, None);
        buf.push(b"ok ");
        buf.push(&[0xff]);
        assert_eq!(buf.into_text(), "ok \u{fffd}");
    }

    #[test]
    fn progress_observer_sees_every_chunk_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut buf = ChannelBuffer::new(Channel::Stderr, Some(tx));
        buf.push(b"one");
        buf.push(b"");
        buf.push(b"two");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.channel, Channel::Stderr);
        assert_eq!(first.chunk, b"one");
        assert_eq!(rx.try_recv().unwrap().chunk, b"two");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_observer_does_not_affect_buffering() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut buf = ChannelBuffer::new(Channel::Stdout, Some(tx));
        buf.push(b"a");
        buf.push(b"b");
        assert_eq!(buf.into_text(), "ab");
    }

    #[tokio::test]
    async fn drain_reads_until_eof() {
        let (mut writer, reader) = tokio::io::duplex(4);
        let producer = tokio::spawn(async move {
            for part in ["ab", "cdef", "ghi"] {
                writer.write_all(part.as_bytes()).await.unwrap();
            }
        });

        let buf = drain(Some(reader), ChannelBuffer::new(Channel::Stdout, None))
            .await
            .unwrap();
        producer.await.unwrap();
        assert_eq!(buf.into_text(), "abcdefghi");
    }

    #[tokio::test]
    async fn drain_without_reader_is_empty() {
        let buf = drain(
            None::<tokio::io::DuplexStream>,
            ChannelBuffer::new(Channel::Stderr, None),
        )
        .await
        .unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.into_text(), "");
    }
}
