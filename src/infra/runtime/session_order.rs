//! Arrival-order execution for one MCP session.
//!
//! rmcp spawns a task per incoming request, so on a multi-thread runtime two
//! pipelined `tools/call`s may start in either order. [`Sequenced`] wraps a
//! session transport and stamps every tool call it reads with a [`Ticket`];
//! the handler waits for its ticket's turn, and a turn ends once the reply has
//! been written. When the peer closes its input, end-of-input is held back
//! until every request read so far has been answered.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use futures::Stream;
use rmcp::{
    model::{
        ClientJsonRpcMessage, ClientRequest, JsonRpcBatchRequestItem, JsonRpcMessage, RequestId,
        ServerJsonRpcMessage,
    },
    service::{RxJsonRpcMessage, TxJsonRpcMessage},
    transport::{
        common::server_side_http::ServerSseMessage,
        streamable_http_server::session::{local::LocalSessionManager, SessionId, SessionManager},
        IntoTransport, Transport,
    },
    RoleServer,
};
use tokio::sync::watch;

#[derive(Debug, Default)]
struct Ledger {
    issued: u64,
    serving: u64,
    finished: BTreeSet<u64>,
    // ids may repeat, so replies are matched first come first served
    pending: HashMap<RequestId, VecDeque<Option<u64>>>,
}

impl Ledger {
    fn finish(&mut self, seq: u64) {
        self.finished.insert(seq);
        while self.finished.remove(&self.serving) {
            self.serving += 1;
        }
    }
}

/// Per-session bookkeeping shared by the transport and the tickets it hands out.
#[derive(Clone)]
pub struct SessionOrder {
    ledger: Arc<watch::Sender<Ledger>>,
}

impl Default for SessionOrder {
    fn default() -> Self {
        Self {
            ledger: Arc::new(watch::Sender::new(Ledger::default())),
        }
    }
}

impl SessionOrder {
    fn admit(&self, id: &RequestId, ordered: bool) -> Option<Ticket> {
        let mut ticket = None;
        self.ledger.send_modify(|l| {
            let seq = ordered.then(|| {
                l.issued += 1;
                l.issued - 1
            });
            l.pending.entry(id.clone()).or_default().push_back(seq);
            ticket = seq.map(|seq| Ticket {
                seq,
                order: self.clone(),
            });
        });
        ticket
    }

    fn answered(&self, id: &RequestId) {
        self.ledger.send_modify(|l| {
            let Some(waiting) = l.pending.get_mut(id) else {
                return;
            };
            let seq = waiting.pop_front().flatten();
            if waiting.is_empty() {
                l.pending.remove(id);
            }
            if let Some(seq) = seq {
                l.finish(seq);
            }
        });
    }

    /// Requests read but not yet answered.
    pub fn outstanding(&self) -> usize {
        self.ledger.borrow().pending.values().map(VecDeque::len).sum()
    }

    async fn drained(&self) {
        let mut rx = self.ledger.subscribe();
        let _ = rx.wait_for(|l| l.pending.is_empty()).await;
    }
}

/// Place of one `tools/call` in its session's arrival order.
#[derive(Clone)]
pub struct Ticket {
    seq: u64,
    order: SessionOrder,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Resolves once every earlier call in the session has been answered.
    pub async fn turn(&self) {
        let mut rx = self.order.ledger.subscribe();
        let _ = rx.wait_for(|l| l.serving >= self.seq).await;
    }
}

/// Transport wrapper enforcing arrival order and reply draining.
pub struct Sequenced<T> {
    inner: T,
    order: SessionOrder,
    input_closed: bool,
}

impl<T> Sequenced<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            order: SessionOrder::default(),
            input_closed: false,
        }
    }

    fn admit_request(&self, id: &RequestId, request: &mut ClientRequest) {
        if let ClientRequest::CallToolRequest(call) = request {
            if let Some(ticket) = self.order.admit(id, true) {
                call.extensions.insert(ticket);
            }
        } else {
            self.order.admit(id, false);
        }
    }

    fn admit(&self, message: &mut RxJsonRpcMessage<RoleServer>) {
        match message {
            JsonRpcMessage::Request(req) => self.admit_request(&req.id, &mut req.request),
            JsonRpcMessage::BatchRequest(items) => {
                for item in items {
                    if let JsonRpcBatchRequestItem::Request(req) = item {
                        self.admit_request(&req.id, &mut req.request);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Wrap anything rmcp accepts as a server transport.
pub fn sequenced<T, E, A>(
    transport: T,
) -> Sequenced<impl Transport<RoleServer, Error = E> + 'static>
where
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
    A: 'static,
{
    Sequenced::new(transport.into_transport())
}

impl<T> Transport<RoleServer> for Sequenced<T>
where
    T: Transport<RoleServer>,
{
    type Error = T::Error;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send + 'static {
        let answers = match &item {
            JsonRpcMessage::Response(r) => Some(r.id.clone()),
            JsonRpcMessage::Error(e) => Some(e.id.clone()),
            _ => None,
        };
        let order = self.order.clone();
        let write = self.inner.send(item);
        async move {
            let written = write.await;
            if let Some(id) = answers {
                order.answered(&id);
            }
            written
        }
    }

    async fn receive(&mut self) -> Option<RxJsonRpcMessage<RoleServer>> {
        if !self.input_closed {
            match self.inner.receive().await {
                Some(mut message) => {
                    self.admit(&mut message);
                    return Some(message);
                }
                None => {
                    self.input_closed = true;
                    tracing::debug!(
                        outstanding = self.order.outstanding(),
                        "input closed, draining replies"
                    );
                }
            }
        }
        self.order.drained().await;
        None
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.inner.close().await
    }
}

/// [`LocalSessionManager`] whose session transports are [`Sequenced`].
#[derive(Default)]
pub struct SequencedSessionManager {
    inner: LocalSessionManager,
}

impl SessionManager for SequencedSessionManager {
    type Error = <LocalSessionManager as SessionManager>::Error;
    type Transport = Sequenced<<LocalSessionManager as SessionManager>::Transport>;

    async fn create_session(&self) -> Result<(SessionId, Self::Transport), Self::Error> {
        let (id, transport) = self.inner.create_session().await?;
        Ok((id, Sequenced::new(transport)))
    }

    async fn initialize_session(
        &self,
        id: &SessionId,
        message: ClientJsonRpcMessage,
    ) -> Result<ServerJsonRpcMessage, Self::Error> {
        self.inner.initialize_session(id, message).await
    }

    async fn has_session(&self, id: &SessionId) -> Result<bool, Self::Error> {
        self.inner.has_session(id).await
    }

    async fn close_session(&self, id: &SessionId) -> Result<(), Self::Error> {
        self.inner.close_session(id).await
    }

    async fn create_stream(
        &self,
        id: &SessionId,
        message: ClientJsonRpcMessage,
    ) -> Result<impl Stream<Item = ServerSseMessage> + Send + Sync + 'static, Self::Error> {
        self.inner.create_stream(id, message).await
    }

    async fn accept_message(
        &self,
        id: &SessionId,
        message: ClientJsonRpcMessage,
    ) -> Result<(), Self::Error> {
        self.inner.accept_message(id, message).await
    }

    async fn create_standalone_stream(
        &self,
        id: &SessionId,
    ) -> Result<impl Stream<Item = ServerSseMessage> + Send + Sync + 'static, Self::Error> {
        self.inner.create_standalone_stream(id).await
    }

    async fn resume(
        &self,
        id: &SessionId,
        last_event_id: String,
    ) -> Result<impl Stream<Item = ServerSseMessage> + Send + Sync + 'static, Self::Error> {
        self.inner.resume(id, last_event_id).await
    }
}
