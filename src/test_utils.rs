//! Test utilities: temporary git repositories and a loopback HTTP stub

#![cfg(test)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

/// A temporary git repository for testing
pub struct TestRepo {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Create a new empty git repository
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().to_path_buf();

        let repo = git2::Repository::init(&path).expect("Failed to init repo");

        // Configure user for commits
        let mut config = repo.config().expect("Failed to get config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");

        Self { dir, path }
    }

    /// Create a repository with an initial commit
    pub fn with_initial_commit() -> Self {
        let test_repo = Self::new();
        test_repo.create_commit("Initial commit", &[("README.md", "# Test Repo\n")]);
        test_repo
    }

    /// Get the git2 repository
    pub fn repo(&self) -> git2::Repository {
        git2::Repository::open(&self.path).expect("Failed to open repo")
    }

    /// Create a file with content
    pub fn create_file(&self, name: &str, content: &str) {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Stage a file
    pub fn stage_file(&self, name: &str) {
        let repo = self.repo();
        let mut index = repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new(name))
            .expect("Failed to stage file");
        index.write().expect("Failed to write index");
    }

    /// Create a commit with the given files
    pub fn create_commit(&self, message: &str, files: &[(&str, &str)]) -> git2::Oid {
        let repo = self.repo();

        for (name, content) in files {
            self.create_file(name, content);
            self.stage_file(name);
        }

        let mut index = repo.index().expect("Failed to get index");
        let tree_oid = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_oid).expect("Failed to find tree");
        let sig = repo.signature().expect("Failed to get signature");

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.as_ref().into_iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch at the current HEAD
    pub fn create_branch(&self, name: &str) -> git2::Oid {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        let commit = head.peel_to_commit().expect("Failed to get commit");
        repo.branch(name, &commit, false)
            .expect("Failed to create branch");
        commit.id()
    }

    /// Checkout a branch
    pub fn checkout_branch(&self, name: &str) {
        let repo = self.repo();
        let branch = repo
            .find_branch(name, git2::BranchType::Local)
            .expect("Failed to find branch");
        let obj = branch
            .get()
            .peel(git2::ObjectType::Commit)
            .expect("Failed to peel");
        repo.checkout_tree(&obj, None).expect("Failed to checkout");
        repo.set_head(branch.get().name().unwrap())
            .expect("Failed to set HEAD");
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> String {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        head.shorthand().unwrap_or("").to_string()
    }

    /// Get the HEAD commit OID
    pub fn head_oid(&self) -> git2::Oid {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        head.target().expect("Failed to get target")
    }

    /// Add a remote
    pub fn add_remote(&self, name: &str, url: &str) {
        let repo = self.repo();
        repo.remote(name, url).expect("Failed to add remote");
    }

    /// Make `remote` the upstream remote of the current branch
    pub fn set_upstream_remote(&self, remote: &str) {
        let branch = self.current_branch();
        let mut config = self.repo().config().expect("Failed to get config");
        config
            .set_str(&format!("branch.{}.remote", branch), remote)
            .expect("Failed to set branch remote");
        config
            .set_str(
                &format!("branch.{}.merge", branch),
                &format!("refs/heads/{}", branch),
            )
            .expect("Failed to set branch merge");
    }

    /// Detach HEAD at the current commit
    pub fn detach_head(&self) {
        let repo = self.repo();
        let oid = self.head_oid();
        repo.set_head_detached(oid).expect("Failed to detach HEAD");
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// A request received by the stub server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Request body is not JSON")
    }
}

/// Canned response served by the stub server
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
            delay: None,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

/// A loopback HTTP server answering from a route table keyed by
/// `"METHOD /path"`. Unknown routes get a 404.
pub struct MockServer {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl MockServer {
    pub fn start(routes: Vec<(String, MockResponse)>) -> Self {
        Self::start_with(|_| routes)
    }

    /// Build the route table once the server's base URL is known, so
    /// responses can point back at the server itself
    pub fn start_with<F>(routes: F) -> Self
    where
        F: FnOnce(&str) -> Vec<(String, MockResponse)>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let port = listener.local_addr().expect("No local address").port();
        let routes: HashMap<String, MockResponse> =
            routes(&format!("http://127.0.0.1:{}", port)).into_iter().collect();

        Self::serve(listener, move |request| {
            let key = format!("{} {}", request.method, request.path);
            routes
                .get(&key)
                .cloned()
                .unwrap_or_else(|| MockResponse::text(404, format!("No route for {}", key)))
        })
    }

    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        Self::serve(listener, handler)
    }

    fn serve<F>(listener: TcpListener, handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let port = listener.local_addr().expect("No local address").port();
        listener
            .set_nonblocking(true)
            .expect("Failed to set non-blocking");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let handler: Handler = Arc::new(handler);

        thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => Self::handle_connection(stream, &handler, &recorded),
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        });

        Self {
            port,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn handle_connection(
        stream: TcpStream,
        handler: &Handler,
        recorded: &Arc<Mutex<Vec<RecordedRequest>>>,
    ) {
        let _ = stream.set_nonblocking(false);
        let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));

        let mut reader = BufReader::new(stream);
        let Some(request) = Self::read_request(&mut reader) else {
            return;
        };
        recorded.lock().unwrap().push(request.clone());

        let response = handler(&request);
        if let Some(delay) = response.delay {
            thread::sleep(delay);
        }

        let mut stream = reader.into_inner();
        let reply = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.status,
            response.content_type,
            response.body.len(),
            response.body
        );
        let _ = stream.write_all(reply.as_bytes());
        let _ = stream.flush();
    }

    fn read_request(reader: &mut BufReader<TcpStream>) -> Option<RecordedRequest> {
        let mut first_line = String::new();
        reader.read_line(&mut first_line).ok()?;
        let mut parts = first_line.split_whitespace();
        let method = parts.next()?.to_string();
        let target = parts.next()?;
        let path = target.split('?').next().unwrap_or(target).to_string();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).ok()?;
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = vec![0; length];
        reader.read_exact(&mut body).ok()?;

        Some(RecordedRequest {
            method,
            path,
            headers,
            body: String::from_utf8_lossy(&body).to_string(),
        })
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo() {
        let repo = TestRepo::new();
        assert!(repo.path.exists());
        assert!(repo.path.join(".git").exists());
    }

    #[test]
    fn test_create_commit() {
        let repo = TestRepo::with_initial_commit();
        let git_repo = repo.repo();
        let head = git_repo.head().expect("No HEAD");
        assert!(head.target().is_some());
    }

    #[test]
    fn test_checkout_branch() {
        let repo = TestRepo::with_initial_commit();
        repo.create_branch("feature");
        repo.checkout_branch("feature");
        assert_eq!(repo.current_branch(), "feature");
    }

    #[test]
    fn test_stub_server_records_requests() {
        let server = MockServer::start(vec![(
            "GET /ping".to_string(),
            MockResponse::text(200, "pong"),
        )]);

        let mut stream = TcpStream::connect(("127.0.0.1", server.port)).unwrap();
        stream
            .write_all(b"GET /ping?x=1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).unwrap();

        assert!(reply.starts_with("HTTP/1.1 200"));
        assert!(reply.ends_with("pong"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/ping");
        assert_eq!(requests[0].header("host"), Some("localhost"));
    }
}
