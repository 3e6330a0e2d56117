//! Wire framing for the control-cycle protocol.
//!
//! Each cycle the environment server sends `(state_dim + 1)` little-endian
//! f32 values in one fixed-length frame: the state vector first, then one
//! reward scalar. The daemon answers with `action_dim` little-endian f32
//! values. There is no header, no delimiter and no connection handshake;
//! both sides rely on the fixed element counts alone.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One inbound frame: the state vector plus the trailing reward scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct StateFrame {
    pub state: Vec<f32>,
    pub reward: f32,
}

/// Read one state frame. Returns `Ok(None)` when the peer closed the
/// connection cleanly at a frame boundary; EOF inside a frame is an error.
pub async fn read_state_frame<R>(
    reader: &mut R,
    state_dim: usize,
) -> io::Result<Option<StateFrame>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; (state_dim + 1) * 4];
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-frame",
            ));
        }
        filled += n;
    }

    let mut values = buf
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]));
    let state: Vec<f32> = values.by_ref().take(state_dim).collect();
    let reward = values.next().unwrap_or(0.0);

    Ok(Some(StateFrame { state, reward }))
}

/// Write one action frame.
pub async fn write_action_frame<W>(writer: &mut W, action: &[f32]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(action.len() * 4);
    for value in action {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    writer.write_all(&buf).await?;
    writer.flush().await
}
