//! Per-connection request loop and dispatch into the service.
use super::protocol::{Call, Reply, Request, Response};
use crate::service::KvService;
use crate::{NskvError, Result};
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Longest accepted request frame in bytes, excluding the newline.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Serves one connection until EOF, an I/O error, an oversized frame or shutdown.
pub(super) async fn serve_connection<S>(
    service: Arc<KvService>,
    stream: S,
    peer: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_FRAME_LEN));

    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = lines.next() => frame,
        };
        let (response, close) = match frame {
            None => break,
            Some(Err(LinesCodecError::Io(e))) => return Err(e.into()),
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                warn!(%peer, limit = MAX_FRAME_LEN, "request frame too long, closing");
                let err = NskvError::BadRequest(format!(
                    "frame exceeds {} bytes",
                    MAX_FRAME_LEN
                ));
                (Response::err(None, &err), true)
            }
            Some(Ok(line)) if line.trim().is_empty() => continue,
            Some(Ok(line)) => match serde_json::from_str::<Request>(&line) {
                Ok(request) => (dispatch(&service, request).await, false),
                Err(e) => {
                    warn!(%peer, error = %e, "malformed request frame");
                    (Response::err(None, &NskvError::BadRequest(e.to_string())), false)
                }
            },
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
        if close {
            break;
        }
    }

    debug!(%peer, "connection closed");
    Ok(())
}

/// Routes one decoded request to its handler.
pub async fn dispatch(service: &KvService, request: Request) -> Response {
    let Request { id, metadata, call } = request;
    let method = call.method();

    let result = match call {
        Call::UseNamespace { namespace } => service
            .use_namespace(&metadata, &namespace)
            .await
            .map(|token| Reply::Token { token }),
        Call::Set { key, value } => service
            .set(&metadata, &key, value)
            .await
            .map(|r| Reply::Status {
                success: r.success,
                message: r.message,
            }),
        Call::Update { key, value } => service
            .update(&metadata, &key, value)
            .await
            .map(|r| Reply::Status {
                success: r.success,
                message: r.message,
            }),
        Call::Has { key } => service.has(&metadata, &key).await.map(|r| Reply::Status {
            success: r.success,
            message: r.message,
        }),
        Call::Unset { key } => service
            .unset(&metadata, &key)
            .await
            .map(|p| Reply::Pair {
                key: p.key,
                value: p.value,
            }),
        Call::Get { key } => service.get(&metadata, &key).await.map(|p| Reply::Pair {
            key: p.key,
            value: p.value,
        }),
        Call::Count => service
            .count(&metadata)
            .await
            .map(|count| Reply::Count { count }),
        Call::ShowKeys => service
            .show_keys(&metadata)
            .await
            .map(|keys| Reply::Keys { keys }),
        Call::ShowData => service
            .show_data(&metadata)
            .await
            .map(|pairs| Reply::Data { pairs }),
        Call::ShowNamespaces => service
            .show_namespaces(&metadata)
            .await
            .map(|namespaces| Reply::Namespaces { namespaces }),
    };

    match result {
        Ok(reply) => Response::ok(id, reply),
        Err(e) => {
            debug!(method, code = e.code(), "call failed");
            Response::err(id, &e)
        }
    }
}
