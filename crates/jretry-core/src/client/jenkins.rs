//! Jenkins REST client over libcurl.
//!
//! One curl easy handle is kept for the whole session so the connection,
//! basic-auth settings and any session cookie are reused across requests.

use curl::easy::{Auth, Easy, List};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::cell::RefCell;
use url::Url;

use super::{JobInfo, JobQueryClient, LastBuild};
use crate::config::{self, Config, HttpConfig};
use crate::credential::Credential;
use crate::error::ClientError;

/// CSRF token from `crumbIssuer/api/json`.
#[derive(Debug, Deserialize)]
struct Crumb {
    crumb: String,
    #[serde(rename = "crumbRequestField")]
    field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Authenticated session against one Jenkins instance.
pub struct JenkinsClient {
    base: Url,
    user: String,
    credential: Credential,
    http: HttpConfig,
    handle: RefCell<Easy>,
}

impl JenkinsClient {
    pub fn new(
        base_url: &str,
        user: &str,
        credential: Credential,
        http: HttpConfig,
    ) -> Result<Self, ClientError> {
        let base =
            Url::parse(base_url).map_err(|e| ClientError::Url(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Url(format!("{}: not a base url", base_url)));
        }
        Ok(Self {
            base,
            user: user.to_string(),
            credential,
            http,
            handle: RefCell::new(Easy::new()),
        })
    }

    /// Session for the server and user named in `cfg`.
    pub fn connect(cfg: &Config, credential: Credential) -> Result<Self, ClientError> {
        Self::new(&cfg.jenkins_url, &cfg.user, credential, cfg.http)
    }

    fn endpoint(&self, segments: &[&str], query: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query);
        Ok(url)
    }

    /// `a/b` addresses job `b` inside folder `a`: `job/a/job/b/...`.
    fn job_endpoint(
        &self,
        job: &str,
        tail: &[&str],
        query: Option<&str>,
    ) -> Result<Url, ClientError> {
        config::check_job_name(job)
            .map_err(|reason| ClientError::Url(format!("job {:?}: {}", job, reason)))?;
        let mut segments = Vec::new();
        for part in job.split('/') {
            segments.push("job");
            segments.push(part);
        }
        segments.extend_from_slice(tail);
        self.endpoint(&segments, query)
    }

    /// Runs one request on the shared handle. Returns status and body.
    fn request(
        &self,
        method: Method,
        url: &Url,
        headers: &[String],
    ) -> Result<(u32, Vec<u8>), ClientError> {
        let mut easy = self.handle.borrow_mut();
        // Reset keeps live connections and cookies.
        easy.reset();
        easy.url(url.as_str())?;
        easy.username(&self.user)?;
        easy.password(self.credential.expose())?;
        let mut auth = Auth::new();
        auth.basic(true);
        easy.http_auth(&auth)?;
        easy.cookie_file("")?;
        easy.connect_timeout(self.http.connect_timeout())?;
        easy.timeout(self.http.timeout())?;

        match method {
            Method::Get => {
                easy.get(true)?;
                easy.follow_location(true)?;
            }
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(&[])?;
            }
        }

        if !headers.is_empty() {
            let mut list = List::new();
            for h in headers {
                list.append(h)?;
            }
            easy.http_headers(list)?;
        }

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::trace!(method = method.as_str(), %url, status, "jenkins request");
        Ok((status, body))
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let (status, body) = self.request(Method::Get, &url, &[])?;
        if !(200..300).contains(&status) {
            return Err(ClientError::Http {
                method: Method::Get.as_str(),
                url: url.to_string(),
                status,
            });
        }
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// `None` when the server has CSRF protection disabled (404).
    fn crumb(&self) -> Result<Option<Crumb>, ClientError> {
        let url = self.endpoint(&["crumbIssuer", "api", "json"], None)?;
        match self.get_json::<Crumb>(url) {
            Ok(crumb) => Ok(Some(crumb)),
            Err(ClientError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl JobQueryClient for JenkinsClient {
    fn last_build(&self, job: &str) -> Result<LastBuild, ClientError> {
        let url = self.job_endpoint(
            job,
            &["lastBuild", "api", "json"],
            Some("tree=building,result"),
        )?;
        self.get_json(url)
    }

    fn job_info(&self, job: &str) -> Result<JobInfo, ClientError> {
        let url = self.job_endpoint(job, &["api", "json"], Some("tree=inQueue"))?;
        self.get_json(url)
    }

    fn build(&self, job: &str) -> Result<(), ClientError> {
        let headers: Vec<String> = self
            .crumb()?
            .map(|c| format!("{}: {}", c.field, c.crumb))
            .into_iter()
            .collect();
        let url = self.job_endpoint(job, &["build"], None)?;
        let (status, _) = self.request(Method::Post, &url, &headers)?;
        // 201 on current Jenkins, a redirect to the job page on older ones.
        if !(200..400).contains(&status) {
            return Err(ClientError::Http {
                method: Method::Post.as_str(),
                url: url.to_string(),
                status,
            });
        }
        Ok(())
    }
}
