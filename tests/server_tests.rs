use nskv::server::protocol::{Call, Outcome, Reply, Request, Response};
use nskv::{CallMetadata, Credential, CredentialStore, KvService, Server, TokenConfig};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_id: 1,
        }
    }

    async fn send_raw(&mut self, line: &str) -> Response {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        let reply = self.lines.next_line().await.unwrap().unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    async fn call(&mut self, metadata: &CallMetadata, call: Call) -> Response {
        let request = Request {
            id: Some(self.next_id),
            metadata: metadata.clone(),
            call,
        };
        self.next_id += 1;
        let line = serde_json::to_string(&request).unwrap();
        let response = self.send_raw(&line).await;
        assert_eq!(response.id, Some(self.next_id - 1));
        response
    }
}

async fn start() -> (SocketAddr, CancellationToken, JoinHandle<()>) {
    let users = CredentialStore::from_credentials(vec![Credential {
        username: "admin".into(),
        password: "admin123".into(),
        perms: vec![],
    }])
    .unwrap();
    let service = KvService::builder()
        .with_credentials(users)
        .with_token_config(TokenConfig::new(b"server-test-secret-at-least-32-bytes".to_vec()))
        .build()
        .unwrap();

    let server = Server::bind(service, "127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let handle = tokio::spawn(async move {
        server.serve(token).await.unwrap();
    });
    (addr, shutdown, handle)
}

fn expect_ok(response: Response) -> Reply {
    match response.outcome {
        Outcome::Ok(reply) => reply,
        Outcome::Err(e) => panic!("unexpected error: {:?}", e),
    }
}

fn expect_err(response: Response) -> String {
    match response.outcome {
        Outcome::Err(e) => e.code,
        Outcome::Ok(reply) => panic!("unexpected success: {:?}", reply),
    }
}

#[tokio::test]
async fn test_full_session_over_tcp() {
    let (addr, shutdown, handle) = start().await;
    let mut client = Client::connect(addr).await;
    let login = CallMetadata::login("admin", "admin123");

    let token = match expect_ok(
        client
            .call(&login, Call::UseNamespace { namespace: "proj1".into() })
            .await,
    ) {
        Reply::Token { token } => token,
        other => panic!("expected token, got {:?}", other),
    };
    let meta = login.clone().with_token(token);

    let set = expect_ok(
        client
            .call(&meta, Call::Set { key: "k".into(), value: "v".into() })
            .await,
    );
    assert_eq!(
        set,
        Reply::Status {
            success: true,
            message: "(1 pair(s) affected)".into()
        }
    );

    let dup = client
        .call(&meta, Call::Set { key: "k".into(), value: "w".into() })
        .await;
    assert_eq!(expect_err(dup), "key_exists");

    let get = expect_ok(client.call(&meta, Call::Get { key: "k".into() }).await);
    assert_eq!(
        get,
        Reply::Pair {
            key: "k".into(),
            value: "v".into()
        }
    );

    assert_eq!(
        expect_ok(client.call(&meta, Call::Count).await),
        Reply::Count { count: 1 }
    );
    assert_eq!(
        expect_ok(client.call(&meta, Call::ShowKeys).await),
        Reply::Keys { keys: vec!["k".into()] }
    );
    assert_eq!(
        expect_ok(client.call(&login, Call::ShowNamespaces).await),
        Reply::Namespaces { namespaces: vec!["proj1".into()] }
    );

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_errors_over_tcp() {
    let (addr, shutdown, handle) = start().await;
    let mut client = Client::connect(addr).await;

    let no_creds = client
        .call(&CallMetadata::default(), Call::Get { key: "k".into() })
        .await;
    assert_eq!(expect_err(no_creds), "missing_credential_metadata");

    let login = CallMetadata::login("admin", "admin123");
    assert_eq!(
        expect_err(client.call(&login, Call::Get { key: "k".into() }).await),
        "missing_token"
    );
    assert_eq!(
        expect_err(
            client
                .call(&login, Call::UseNamespace { namespace: "a.b".into() })
                .await
        ),
        "invalid_namespace"
    );

    let bad = client.send_raw("{not json").await;
    assert_eq!(bad.id, None);
    assert_eq!(expect_err(bad), "bad_request");

    // The connection survives a malformed frame.
    let unknown = client
        .send_raw(r#"{"id":9,"call":{"method":"Drop"}}"#)
        .await;
    assert_eq!(expect_err(unknown), "bad_request");

    shutdown.cancel();
    handle.await.unwrap();
}
