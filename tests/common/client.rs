//! Line-oriented test IRC client.
//!
//! Sends raw commands and asserts on received lines.

#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            nick: nick.to_string(),
        })
    }

    /// Send a raw IRC line, appending `\r\n` when missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line, trimmed of the terminator.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.recv_line_timeout(Duration::from_secs(5)).await
    }

    /// Receive one line with an explicit timeout.
    pub async fn recv_line_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end().to_string())
    }

    /// Receive lines until the predicate matches; returns everything
    /// received including the matching line.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<String>>
    where
        F: FnMut(&str) -> bool,
    {
        let mut lines = Vec::new();
        loop {
            let line = self.recv_line().await?;
            let done = predicate(&line);
            lines.push(line);
            if done {
                break;
            }
        }
        Ok(lines)
    }

    /// Register with NICK/PASS/USER and consume the welcome banner
    /// through the auto-join echo (scenario deployment).
    pub async fn register(&mut self) -> anyhow::Result<Vec<String>> {
        self.send_raw(&format!("NICK {}", self.nick)).await?;
        self.send_raw("PASS x").await?;
        self.send_raw(&format!("USER {} 0 * :{}", self.nick, self.nick))
            .await?;
        let nick = self.nick.clone();
        let join_echo = format!(":{nick}!{nick} JOIN ");
        self.recv_until(|line| line.starts_with(&join_echo)).await
    }

    /// True when the server closes the connection within `dur` without
    /// sending anything further.
    pub async fn expect_silent_close(&mut self, dur: Duration) -> anyhow::Result<bool> {
        let mut line = String::new();
        match timeout(dur, self.reader.read_line(&mut line)).await {
            Ok(Ok(0)) => Ok(true),
            Ok(Ok(_)) => anyhow::bail!("unexpected line before close: {line:?}"),
            Ok(Err(_)) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    /// True when the server closes the connection within `dur`,
    /// discarding any remaining lines.
    pub async fn expect_close(&mut self, dur: Duration) -> bool {
        let mut line = String::new();
        loop {
            line.clear();
            match timeout(dur, self.reader.read_line(&mut line)).await {
                Ok(Ok(0)) => return true,
                Ok(Ok(_)) => continue,
                Ok(Err(_)) => return true,
                Err(_) => return false,
            }
        }
    }
}
