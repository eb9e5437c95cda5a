//! Stdio transport for MCP protocol.
//!
//! Handles newline-delimited JSON-RPC 2.0 over stdin/stdout. Logs go to
//! stderr, so stdout carries protocol messages only.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{Dispatcher, JsonRpcRequest, JsonRpcResponse};

/// Handle MCP protocol over the process's stdin and stdout.
///
/// # Errors
///
/// Returns error on I/O failure.
pub async fn run_stdio(dispatcher: Dispatcher) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    tracing::info!("MCP stdio server ready, waiting for requests...");
    serve(&dispatcher, reader, writer).await
}

/// Serve requests from `reader` until EOF, writing replies to `writer`.
///
/// # Errors
///
/// Returns error on I/O failure.
pub async fn serve<R, W>(dispatcher: &Dispatcher, mut reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            tracing::info!("Stdin closed, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(request) => dispatcher.handle(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable request line");
                Some(JsonRpcResponse::parse_error(&e))
            }
        };

        if let Some(response) = response {
            write_message(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> anyhow::Result<()> {
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::ArxivClient;
    use crate::config::Config;
    use crate::tools::{self, ToolContext};

    fn dispatcher() -> Dispatcher {
        let config = Config::for_testing("http://127.0.0.1:9");
        let client = ArxivClient::new(&config).unwrap();
        Dispatcher::new(tools::register_all_tools(), ToolContext::new(Arc::new(client), Arc::new(config)))
    }

    async fn exchange(input: &str) -> Vec<serde_json::Value> {
        let mut output = Vec::new();
        serve(&dispatcher(), input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_reply_per_request_line() {
        let replies = exchange(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        ))
        .await;

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["result"]["tools"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_garbage_line_gets_parse_error() {
        let replies = exchange("this is not json\n").await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["error"]["code"], -32700);
    }
}
