//! Console gateway meant to mediate access to the store and the permission table.

use super::types::{Request, Response};
use crate::{access::AccessControl, expiring::ExpiringStore, storage::Store};
use anyhow::Result;
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct ConsoleService<R, W, S> {
    requests: R,
    responses: W,
    store: ExpiringStore<S>,
    policy: Arc<AccessControl>,
}

impl<R, W, S> ConsoleService<R, W, S>
where
    R: Stream<Item = anyhow::Result<Request>> + Unpin,
    W: Sink<Response, Error = anyhow::Error> + Unpin,
    S: Store,
    anyhow::Error: From<S::Err>,
{
    pub fn new(requests: R, responses: W, store: ExpiringStore<S>, policy: Arc<AccessControl>) -> Self {
        Self {
            requests,
            responses,
            store,
            policy,
        }
    }

    pub async fn handle(mut self) -> Result<()> {
        while let Some(req) = self.requests.next().await {
            let res = self.process(req?).await?;
            self.responses.send(res).await?;
        }
        Ok(())
    }

    async fn process(&mut self, req: Request) -> Result<Response> {
        match req {
            Request::Put {
                key,
                value,
                expire_at,
            } => {
                info!("put: key: {} value: {} expire_at: {}", key, value, expire_at);
                self.store.put(key.clone(), value, expire_at).await?;
                Ok(Response::Put { key })
            }
            Request::Get { key } => {
                info!("get: key: {}", key);
                let value = self.store.get(&key).await?;
                Ok(Response::Get { key, value })
            }
            Request::Exists { key } => {
                info!("exists: key: {}", key);
                let exists = self.store.exists(&key).await?;
                Ok(Response::Exists { key, exists })
            }
            Request::Del { key } => {
                info!("del: key: {}", key);
                self.store.delete(&key).await?;
                Ok(Response::Del { key })
            }
            Request::Can {
                role,
                resource,
                attribute,
            } => {
                info!("can: role: {} resource: {} attribute: {}", role, resource, attribute);
                let granted = self.can_read(&role, &resource, &attribute);
                Ok(Response::Can {
                    role,
                    resource,
                    attribute,
                    granted,
                })
            }
        }
    }

    fn can_read(&self, role: &str, resource: &str, attribute: &str) -> bool {
        match self.policy.can(role) {
            Ok(query) => query.read_any(resource).allows(attribute),
            Err(e) => {
                warn!(reason = %e, "denying");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{access::table::post_permissions, api::framed, storage::inmemory, storage::types::unix_now};
    use tokio::io::{duplex, split, AsyncReadExt, AsyncWriteExt};

    async fn converse(input: String) -> Result<String> {
        let (mut client, server) = duplex(4096);
        let (reader, writer) = split(server);
        let (requests, responses) = framed(reader, writer);
        let service = ConsoleService::new(
            requests,
            responses,
            ExpiringStore::new(inmemory::start()),
            Arc::new(post_permissions()?),
        );

        client.write_all(input.as_bytes()).await?;
        client.shutdown().await?;
        let outcome = service.handle().await;

        let mut output = String::new();
        client.read_to_string(&mut output).await?;
        outcome.map(|_| output)
    }

    #[tokio::test]
    async fn serves_store_commands() {
        // Pre-condition.
        let input = format!(
            "GET session:1\nPUT session:1 abc {}\nGET session:1\nEXISTS session:1\nDEL session:1\nEXISTS session:1\nDEL session:1\n",
            unix_now() + 60
        );

        // Action.
        let output = converse(input).await.unwrap();

        // Post-condition.
        assert_eq!(
            output,
            "FAIL session:1\nOKAY session:1\nOKAY session:1 abc\nOKAY session:1\nOKAY session:1\nFAIL session:1\nOKAY session:1\n"
        );
    }

    #[tokio::test]
    async fn serves_permission_checks() {
        // Pre-condition.
        let input = "CAN assinante post titulo\nCAN assinante post senha\nCAN visitante post titulo\n";

        // Action.
        let output = converse(input.into()).await.unwrap();

        // Post-condition.
        assert_eq!(
            output,
            "OKAY assinante post titulo\nFAIL assinante post senha\nFAIL visitante post titulo\n"
        );
    }

    #[tokio::test]
    async fn stops_at_malformed_request() {
        // Pre-condition.
        let input = "GET key\nFLUSHALL\nGET key\n";

        // Action.
        let outcome = converse(input.into()).await;

        // Post-condition.
        assert!(outcome.is_err());
    }
}
