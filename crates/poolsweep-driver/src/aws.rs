use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use poolsweep_domain::{Page, PageToken, Region, ResourceHandle};
use reqwest::Url;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::client::{ClientFactory, DirectoryClient};
use crate::error::ClientError;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "cognito-idp";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

// ── Credentials ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id:     String,
    pub secret_access_key: String,
    pub session_token:     Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
pub trait CredentialsProvider: Send + Sync + 'static {
    async fn credentials(&self) -> Result<AwsCredentials, ClientError>;
}

/// Fixed keys, typically from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
pub struct StaticCredentials(AwsCredentials);

impl StaticCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self(AwsCredentials {
            access_key_id:     access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        })
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentials {
    async fn credentials(&self) -> Result<AwsCredentials, ClientError> {
        Ok(self.0.clone())
    }
}

enum MetadataSource {
    /// ECS task role, `AWS_CONTAINER_CREDENTIALS_RELATIVE_URI`.
    Container { relative_uri: String },
    /// EC2 instance profile via IMDSv2.
    Instance,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MetadataCredentialsDoc {
    access_key_id:     String,
    secret_access_key: String,
    token:             Option<String>,
}

/// Role credentials served by the container or instance metadata endpoint,
/// cached for ten minutes.
struct MetadataCredentials {
    http:   reqwest::Client,
    source: MetadataSource,
    cache:  tokio::sync::Mutex<Option<(AwsCredentials, Instant)>>,
}

impl MetadataCredentials {
    fn new(http: reqwest::Client, source: MetadataSource) -> Self {
        Self { http, source, cache: tokio::sync::Mutex::new(None) }
    }

    async fn fetch(&self) -> Result<MetadataCredentialsDoc, ClientError> {
        let meta_err = |e: reqwest::Error| ClientError::Credentials(format!("metadata endpoint: {}", e));
        match &self.source {
            MetadataSource::Container { relative_uri } => {
                let url = format!("http://169.254.170.2{}", relative_uri);
                self.http.get(&url).send().await.map_err(meta_err)?.json().await.map_err(meta_err)
            }
            MetadataSource::Instance => {
                let token = self
                    .http
                    .put("http://169.254.169.254/latest/api/token")
                    .header("X-aws-ec2-metadata-token-ttl-seconds", "21600")
                    .send()
                    .await
                    .map_err(meta_err)?
                    .text()
                    .await
                    .map_err(meta_err)?;

                let roles = self
                    .http
                    .get("http://169.254.169.254/latest/meta-data/iam/security-credentials/")
                    .header("X-aws-ec2-metadata-token", &token)
                    .send()
                    .await
                    .map_err(meta_err)?
                    .text()
                    .await
                    .map_err(meta_err)?;
                let role = roles
                    .lines()
                    .next()
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| ClientError::Credentials("no instance profile role attached".into()))?;

                self.http
                    .get(format!(
                        "http://169.254.169.254/latest/meta-data/iam/security-credentials/{}",
                        role
                    ))
                    .header("X-aws-ec2-metadata-token", &token)
                    .send()
                    .await
                    .map_err(meta_err)?
                    .json()
                    .await
                    .map_err(meta_err)
            }
        }
    }
}

#[async_trait]
impl CredentialsProvider for MetadataCredentials {
    async fn credentials(&self) -> Result<AwsCredentials, ClientError> {
        let mut cache = self.cache.lock().await;
        if let Some((creds, expiry)) = cache.as_ref() {
            if Instant::now() < *expiry {
                return Ok(creds.clone());
            }
        }

        let doc = self.fetch().await?;
        let creds = AwsCredentials {
            access_key_id:     doc.access_key_id,
            secret_access_key: doc.secret_access_key,
            session_token:     doc.token,
        };
        *cache = Some((creds.clone(), Instant::now() + Duration::from_secs(600)));
        Ok(creds)
    }
}

/// Pick a credentials source:
/// 1. `AWS_ACCESS_KEY_ID` + `AWS_SECRET_ACCESS_KEY` (+ `AWS_SESSION_TOKEN`)
/// 2. `AWS_CONTAINER_CREDENTIALS_RELATIVE_URI` (ECS task)
/// 3. EC2 IMDSv2, when the endpoint answers within two seconds
async fn resolve_credentials(
    http: &reqwest::Client,
) -> Result<Arc<dyn CredentialsProvider>, ClientError> {
    if let (Ok(key), Ok(secret)) = (
        std::env::var("AWS_ACCESS_KEY_ID"),
        std::env::var("AWS_SECRET_ACCESS_KEY"),
    ) {
        debug!("using credentials from environment");
        let token = std::env::var("AWS_SESSION_TOKEN").ok().filter(|t| !t.is_empty());
        return Ok(Arc::new(StaticCredentials::new(key, secret, token)));
    }

    if let Ok(relative_uri) = std::env::var("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI") {
        debug!("using container credentials");
        return Ok(Arc::new(MetadataCredentials::new(
            http.clone(),
            MetadataSource::Container { relative_uri },
        )));
    }

    let probe = http
        .put("http://169.254.169.254/latest/api/token")
        .header("X-aws-ec2-metadata-token-ttl-seconds", "10")
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    if probe.is_ok() {
        debug!("using instance profile credentials");
        return Ok(Arc::new(MetadataCredentials::new(http.clone(), MetadataSource::Instance)));
    }

    Err(ClientError::Credentials(
        "no AWS credentials found: set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or run with a role".into(),
    ))
}

// ── SigV4 signing ─────────────────────────────────────────────────────────────

fn sha256_hex(data: &[u8]) -> String {
    hex(&Sha256::digest(data))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    [region.as_bytes(), service.as_bytes(), b"aws4_request".as_slice()]
        .iter()
        .fold(
            hmac_sha256(format!("AWS4{}", secret).as_bytes(), date.as_bytes()),
            |key, part| hmac_sha256(&key, part),
        )
}

/// The parts of a JSON-protocol POST that go into the signature.
struct SigningInput<'a> {
    host:    &'a str,
    path:    &'a str,
    target:  &'a str,
    body:    &'a [u8],
    region:  &'a str,
    service: &'a str,
}

/// Headers to attach so the request verifies under SigV4.
fn sigv4_headers(
    input: &SigningInput<'_>,
    creds: &AwsCredentials,
    now:   DateTime<Utc>,
) -> BTreeMap<String, String> {
    let timestamp    = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date         = now.format("%Y%m%d").to_string();
    let payload_hash = sha256_hex(input.body);

    let mut canonical: BTreeMap<&str, &str> = BTreeMap::new();
    canonical.insert("content-type", CONTENT_TYPE);
    canonical.insert("host", input.host);
    canonical.insert("x-amz-content-sha256", &payload_hash);
    canonical.insert("x-amz-date", &timestamp);
    canonical.insert("x-amz-target", input.target);
    if let Some(token) = &creds.session_token {
        canonical.insert("x-amz-security-token", token);
    }

    let signed_headers = canonical.keys().copied().collect::<Vec<_>>().join(";");
    let canonical_headers: String =
        canonical.iter().map(|(k, v)| format!("{}:{}\n", k, v.trim())).collect();
    let canonical_request = format!(
        "POST\n{}\n\n{}\n{}\n{}",
        input.path, canonical_headers, signed_headers, payload_hash
    );

    let scope = format!("{}/{}/{}/aws4_request", date, input.region, input.service);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        timestamp,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );
    let key       = signing_key(&creds.secret_access_key, &date, input.region, input.service);
    let signature = hex(&hmac_sha256(&key, string_to_sign.as_bytes()));

    let mut out = BTreeMap::new();
    out.insert(
        "Authorization".to_string(),
        format!(
            "AWS4-HMAC-SHA256 Credential={}/{},SignedHeaders={},Signature={}",
            creds.access_key_id, scope, signed_headers, signature
        ),
    );
    out.insert("x-amz-date".to_string(), timestamp.clone());
    out.insert("x-amz-content-sha256".to_string(), payload_hash.clone());
    if let Some(token) = &creds.session_token {
        out.insert("x-amz-security-token".to_string(), token.clone());
    }
    out
}

/// `host[:port]` as the HTTP client will send it in the `Host` header.
fn host_header(url: &Url) -> Result<String, ClientError> {
    let host = url
        .host_str()
        .ok_or_else(|| ClientError::Setup(format!("endpoint {} has no host", url)))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None       => host.to_string(),
    })
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserPoolSummary {
    id:   String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListUserPoolsOutput {
    #[serde(default)]
    user_pools: Vec<UserPoolSummary>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeUserPoolOutput {
    user_pool: UserPoolSummary,
}

/// Turn an error body into a [`ClientError::Api`].
///
/// `__type` arrives either bare (`ResourceNotFoundException`) or qualified
/// (`com.amazonaws.cognito.identity.idp.model#ResourceNotFoundException`),
/// sometimes with a `:<uri>` suffix.
fn parse_error(status: u16, body: &str) -> ClientError {
    let v: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let code = v["__type"]
        .as_str()
        .and_then(|t| t.rsplit('#').next())
        .and_then(|t| t.split(':').next())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HttpStatus{}", status));
    let message = v["message"]
        .as_str()
        .or_else(|| v["Message"].as_str())
        .unwrap_or("")
        .to_string();
    ClientError::Api { code, message, status }
}

// ── CognitoClient ─────────────────────────────────────────────────────────────

/// [`DirectoryClient`] speaking the Cognito Identity Provider JSON 1.1 API.
pub struct CognitoClient {
    http:     reqwest::Client,
    endpoint: Url,
    host:     String,
    region:   Region,
    creds:    Arc<dyn CredentialsProvider>,
}

impl CognitoClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: Url,
        region: Region,
        creds: Arc<dyn CredentialsProvider>,
    ) -> Result<Self, ClientError> {
        let host = host_header(&endpoint)?;
        Ok(Self { http, endpoint, host, region, creds })
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, body: &Value) -> Result<T, ClientError> {
        let creds  = self.creds.credentials().await?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let bytes  = serde_json::to_vec(body).map_err(|e| ClientError::Decode(e.to_string()))?;

        let signed = sigv4_headers(
            &SigningInput {
                host:    &self.host,
                path:    self.endpoint.path(),
                target:  &target,
                body:    &bytes,
                region:  self.region.as_str(),
                service: SERVICE,
            },
            &creds,
            Utc::now(),
        );

        let mut req = self
            .http
            .post(self.endpoint.clone())
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", &target)
            .body(bytes);
        for (k, v) in &signed {
            req = req.header(k, v);
        }

        debug!(region = %self.region, operation, "cognito-idp request");
        let resp   = req.send().await?;
        let status = resp.status().as_u16();
        let text   = resp.text().await?;

        if status >= 400 {
            return Err(parse_error(status, &text));
        }
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ClientError::Decode(format!("{}: {}", operation, e)))
    }
}

#[async_trait]
impl DirectoryClient for CognitoClient {
    fn region(&self) -> &Region {
        &self.region
    }

    async fn list_resources(
        &self,
        max_results: u32,
        token: Option<&PageToken>,
    ) -> Result<Page, ClientError> {
        let mut body = json!({ "MaxResults": max_results });
        if let Some(t) = token {
            body["NextToken"] = Value::String(t.as_str().to_string());
        }
        let out: ListUserPoolsOutput = self.call("ListUserPools", &body).await?;
        Ok(Page {
            items: out
                .user_pools
                .into_iter()
                .map(|p| ResourceHandle::new(p.id, p.name))
                .collect(),
            next: PageToken::from_remote(out.next_token.as_deref()),
        })
    }

    async fn delete_resource(&self, id: &str) -> Result<(), ClientError> {
        let _: IgnoredAny = self.call("DeleteUserPool", &json!({ "UserPoolId": id })).await?;
        Ok(())
    }

    async fn describe_resource(&self, id: &str) -> Result<ResourceHandle, ClientError> {
        let out: DescribeUserPoolOutput =
            self.call("DescribeUserPool", &json!({ "UserPoolId": id })).await?;
        Ok(ResourceHandle::new(out.user_pool.id, out.user_pool.name))
    }
}

// ── CognitoClientFactory ──────────────────────────────────────────────────────

/// Builds [`CognitoClient`]s sharing one HTTP pool and credentials source.
pub struct CognitoClientFactory {
    http:     reqwest::Client,
    creds:    Arc<dyn CredentialsProvider>,
    /// Replaces `https://cognito-idp.{region}.amazonaws.com/` for every region.
    endpoint: Option<String>,
}

impl CognitoClientFactory {
    /// Resolve credentials from the environment; see [`resolve_credentials`].
    pub async fn from_env(endpoint: Option<String>) -> Result<Self, ClientError> {
        let http  = reqwest::Client::new();
        let creds = resolve_credentials(&http).await?;
        Ok(Self { http, creds, endpoint })
    }

    pub fn with_credentials(
        creds: impl CredentialsProvider,
        endpoint: Option<String>,
    ) -> Self {
        Self { http: reqwest::Client::new(), creds: Arc::new(creds), endpoint }
    }

    fn endpoint_for(&self, region: &Region) -> Result<Url, ClientError> {
        let raw = match &self.endpoint {
            Some(e) => e.clone(),
            None    => format!("https://{}.{}.amazonaws.com/", SERVICE, region),
        };
        Url::parse(&raw).map_err(|e| ClientError::Setup(format!("invalid endpoint {:?}: {}", raw, e)))
    }
}

#[async_trait]
impl ClientFactory for CognitoClientFactory {
    async fn client_for(&self, region: &Region) -> Result<Arc<dyn DirectoryClient>, ClientError> {
        let endpoint = self.endpoint_for(region)?;
        let client = CognitoClient::new(self.http.clone(), endpoint, region.clone(), self.creds.clone())?;
        Ok(Arc::new(client))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
