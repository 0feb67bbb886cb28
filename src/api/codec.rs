//! Codec for the console protocol through which requests/responses are exchanged.
//!
//! Both request and response are line-delimited and further split by
//! whitespaces into components.
//!
//! # Request
//!
//! - `PUT $key $value $expire_at\n` where `$expire_at` is in epoch seconds
//! - `GET $key\n`
//! - `EXISTS $key\n`
//! - `DEL $key\n`
//! - `CAN $role $resource $attribute\n` checks read access
//!
//! # Response
//!
//! - PUT, DEL
//!     - `OKAY $key\n`
//! - GET
//!     - `OKAY $key $value\n`
//!     - `FAIL $key\n` when absent
//! - EXISTS
//!     - `OKAY $key\n` or `FAIL $key\n`
//! - CAN
//!     - `OKAY $role $resource $attribute\n` or `FAIL $role $resource $attribute\n`

use super::types::{Request, Response, Status};
use anyhow::{bail, Context, Result};
use bytes::BytesMut;
use std::str::Split;
use tokio_util::codec::{Decoder, Encoder, LinesCodec};

#[derive(Default, Debug)]
pub struct Codec {
    lines: LinesCodec,
}

impl Decoder for Codec {
    type Item = Request;

    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.lines
            .decode(src)
            .context("unable to decode request line")?
            .as_deref()
            .map(Request::from_wire)
            .transpose()
            .context("unable to parse request")
    }
}

impl Encoder<Response> for Codec {
    type Error = anyhow::Error;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.lines
            .encode(item.into_wire(), dst)
            .context("unable to encode response line")
    }
}

fn next_component(components: &mut Split<'_, char>, what: &str, command: &str) -> Result<String> {
    components
        .next()
        .with_context(|| format!("missing {} from {} command", what, command))
        .map(Into::into)
}

impl Request {
    fn from_wire(line: &str) -> Result<Self> {
        let mut components = line.split(' ');

        let command = components.next().context("missing command")?;

        let request = match command {
            "PUT" => {
                let key = next_component(&mut components, "key", command)?;
                let value = next_component(&mut components, "value", command)?;
                let expire_at = next_component(&mut components, "expiration", command)?
                    .parse()
                    .context("expiration must be a number of seconds since the epoch")?;

                Request::Put {
                    key,
                    value,
                    expire_at,
                }
            }
            "GET" => Request::Get {
                key: next_component(&mut components, "key", command)?,
            },
            "EXISTS" => Request::Exists {
                key: next_component(&mut components, "key", command)?,
            },
            "DEL" => Request::Del {
                key: next_component(&mut components, "key", command)?,
            },
            "CAN" => {
                let role = next_component(&mut components, "role", command)?;
                let resource = next_component(&mut components, "resource", command)?;
                let attribute = next_component(&mut components, "attribute", command)?;

                Request::Can {
                    role,
                    resource,
                    attribute,
                }
            }
            _ => bail!("unrecognized command: {}", command),
        };

        if let Some(extra) = components.next() {
            bail!("unexpected argument to {} command: {}", command, extra);
        }

        Ok(request)
    }
}

impl Response {
    fn into_wire(self) -> String {
        let status = self.status().into_wire();
        match self {
            Response::Put { key } | Response::Del { key } | Response::Exists { key, .. } => {
                format!("{} {}", status, key)
            }
            Response::Get { key, value } => value
                .map(|value| format!("{} {} {}", status, key, value))
                .unwrap_or_else(|| format!("{} {}", status, key)),
            Response::Can {
                role,
                resource,
                attribute,
                ..
            } => format!("{} {} {} {}", status, role, resource, attribute),
        }
    }
}

impl Status {
    fn into_wire(self) -> &'static str {
        match self {
            Status::Okay => "OKAY",
            Status::Fail => "FAIL",
        }
    }
}
