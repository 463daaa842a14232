use std::env;
use std::io::{self, BufRead};
use std::process;

use anyhow::{bail, Context, Result};
use bytes::{Bytes, BytesMut};
use log::debug;

// Reads a single line from `reader`, without its line terminator.
fn read_line<R: BufRead>(mut reader: R) -> Result<Bytes> {
    let mut line = BytesMut::new();
    loop {
        let buf = reader.fill_buf().context("failed to read input line")?;
        if buf.is_empty() {
            break;
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(end) => {
                line.extend_from_slice(&buf[..end]);
                reader.consume(end + 1);
                break;
            }
            None => {
                let len = buf.len();
                line.extend_from_slice(buf);
                reader.consume(len);
            }
        }
    }
    if line.ends_with(b"\r") {
        line.truncate(line.len() - 1);
    }
    Ok(line.freeze())
}

fn run() -> Result<bool> {
    let mut args = env::args().skip(1);
    if args.next().as_deref() != Some("-E") {
        bail!("expected first argument to be '-E'");
    }
    let Some(pattern) = args.next() else {
        bail!("missing pattern");
    };

    let re = sre::compile(&pattern)
        .with_context(|| format!("invalid pattern {:?}", pattern))?;
    let line = read_line(io::stdin().lock())?;
    debug!("matching {} bytes against {:?}", line.len(), pattern);

    Ok(sre::matches(&re, &line))
}

// Usage: echo <input_text> | sre -E <pattern>
fn main() {
    env_logger::init();

    match run() {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(2)
        }
    }
}
