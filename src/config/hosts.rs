// src/config/hosts.rs

//! Host list parsing.
//!
//! One entry per line in host files, whitespace-separated in `-H` strings:
//!
//! ```text
//! # comment
//! web1.example.com
//! deploy@web2.example.com:2222
//! [2001:db8::1]:22 admin
//! ```
//!
//! A trailing second field on a host-file line names the login user, unless
//! the address already carried one.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::errors::{PsshError, Result};
use crate::types::Target;

/// Parse one `[user@]host[:port]` address.
pub fn parse_host_entry(entry: &str) -> std::result::Result<Target, String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err("empty host entry".to_string());
    }

    let (user, rest) = match entry.rsplit_once('@') {
        Some((user, rest)) if !user.is_empty() => (Some(user), rest),
        Some(_) => return Err(format!("missing user before '@' in '{entry}'")),
        None => (None, entry),
    };

    let (host, port) = split_host_port(rest)?;
    if host.is_empty() {
        return Err(format!("missing host name in '{entry}'"));
    }

    let mut target = Target::new(host);
    if let Some(port) = port {
        target = target.with_port(port);
    }
    if let Some(user) = user {
        target = target.with_user(user);
    }
    Ok(target)
}

fn split_host_port(rest: &str) -> std::result::Result<(&str, Option<u16>), String> {
    if let Some(bracketed) = rest.strip_prefix('[') {
        let (host, after) = bracketed
            .split_once(']')
            .ok_or_else(|| format!("unterminated '[' in '{rest}'"))?;
        return match after {
            "" => Ok((host, None)),
            _ => match after.strip_prefix(':') {
                Some(port) => Ok((host, Some(parse_port(port)?))),
                None => Err(format!("unexpected text after ']' in '{rest}'")),
            },
        };
    }

    // More than one ':' without brackets is a bare IPv6 address.
    if rest.matches(':').count() > 1 {
        return Ok((rest, None));
    }
    match rest.split_once(':') {
        Some((host, port)) => Ok((host, Some(parse_port(port)?))),
        None => Ok((rest, None)),
    }
}

fn parse_port(port: &str) -> std::result::Result<u16, String> {
    port.parse::<u16>()
        .map_err(|e| format!("invalid port '{port}': {e}"))
}

/// Parse the contents of a host file. `origin` is only used in errors.
pub fn parse_host_lines(contents: &str, origin: &str) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = match raw.split_once('#') {
            Some((before, _)) => before,
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let address = fields.next().unwrap_or_default();
        let login = fields.next();
        if fields.next().is_some() {
            return Err(PsshError::HostParse(format!(
                "{origin}:{}: too many fields in '{line}'",
                idx + 1
            )));
        }

        let mut target = parse_host_entry(address)
            .map_err(|msg| PsshError::HostParse(format!("{origin}:{}: {msg}", idx + 1)))?;
        if target.user.is_none() {
            if let Some(login) = login {
                target = target.with_user(login);
            }
        }
        targets.push(target);
    }
    Ok(targets)
}

/// Parse a `-H` string: any number of whitespace-separated addresses.
pub fn parse_host_string(spec: &str) -> Result<Vec<Target>> {
    spec.split_whitespace()
        .map(|entry| parse_host_entry(entry).map_err(PsshError::HostParse))
        .collect()
}

pub fn read_host_file(path: impl AsRef<Path>) -> Result<Vec<Target>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading host file {:?}", path))?;
    parse_host_lines(&contents, &path.display().to_string())
}
