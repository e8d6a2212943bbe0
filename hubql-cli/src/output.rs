//! # Output
//!
//! Everything the CLI prints is JSON: single records pretty-printed, list
//! results as one compact record per line so they can be piped while later
//! pages are still being fetched.

#![allow(clippy::print_stdout)]

use std::io::{self, Write};

use anyhow::{Context, Result};
use hubql_client::{PageSource, PageStream};
use serde::Serialize;

/// Print one record as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
  println!("{json}");
  Ok(())
}

/// Print an optional record, failing with `what` when it is absent
pub fn print_found<T: Serialize>(value: Option<T>, what: &str) -> Result<()> {
  match value {
    Some(value) => print_json(&value),
    None => anyhow::bail!("{what} not found"),
  }
}

/// Stream up to `limit` items as JSON lines; returns how many were written
pub async fn print_stream<S>(mut stream: PageStream<S>, limit: Option<usize>) -> Result<usize>
where
  S: PageSource,
  S::Item: Serialize,
{
  let stdout = io::stdout();
  let mut out = stdout.lock();
  write_stream(&mut stream, limit, &mut out).await
}

async fn write_stream<S, W>(stream: &mut PageStream<S>, limit: Option<usize>, out: &mut W) -> Result<usize>
where
  S: PageSource,
  S::Item: Serialize,
  W: Write,
{
  let mut written = 0;
  while limit.is_none_or(|limit| written < limit) {
    let Some(item) = stream.try_next().await? else {
      break;
    };
    serde_json::to_writer(&mut *out, &item).context("Failed to serialize output")?;
    writeln!(out)?;
    written += 1;
  }
  out.flush()?;
  Ok(written)
}

#[cfg(test)]
mod tests {
  use hubql_client::{Page, PageInfo};

  use super::*;

  struct Numbers {
    pages: Vec<Vec<u32>>,
  }

  impl PageSource for Numbers {
    type Item = u32;

    async fn fetch(&mut self, after: Option<String>) -> hubql_client::Result<Page<u32>> {
      let index = after.map_or(0, |cursor| cursor.parse::<usize>().unwrap_or(0));
      let items = self.pages.get(index).cloned().unwrap_or_default();
      let has_next_page = index + 1 < self.pages.len();
      Ok(Page {
        items,
        page_info: PageInfo {
          has_next_page,
          end_cursor: has_next_page.then(|| (index + 1).to_string()),
        },
        total_count: None,
      })
    }
  }

  #[tokio::test]
  async fn test_write_stream_all() -> anyhow::Result<()> {
    let mut stream = PageStream::new(Numbers {
      pages: vec![vec![1, 2], vec![3]],
    });
    let mut out = Vec::new();
    let written = write_stream(&mut stream, None, &mut out).await?;
    assert_eq!(written, 3);
    assert_eq!(String::from_utf8(out)?, "1\n2\n3\n");
    Ok(())
  }

  #[tokio::test]
  async fn test_write_stream_limit_stops_fetching() -> anyhow::Result<()> {
    let mut stream = PageStream::new(Numbers {
      pages: vec![vec![1, 2], vec![3]],
    });
    let mut out = Vec::new();
    let written = write_stream(&mut stream, Some(2), &mut out).await?;
    assert_eq!(written, 2);
    assert_eq!(stream.pages_fetched(), 1);
    Ok(())
  }
}
