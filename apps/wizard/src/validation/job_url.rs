use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobUrlError {
    #[error("Please enter a URL")]
    Empty,

    #[error("Please enter a valid URL")]
    Malformed,

    #[error("URL must start with http:// or https://")]
    UnsupportedScheme,

    #[error("LinkedIn job postings cannot be scraped due to their terms of service")]
    LinkedInJobPosting,
}

/// Checks that `input` is a scrapeable job posting URL.
pub fn validate_job_url(input: &str) -> Result<Url, JobUrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JobUrlError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|_| JobUrlError::Malformed)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(JobUrlError::UnsupportedScheme);
    }

    let is_linkedin = url
        .host_str()
        .map(|host| host.contains("linkedin.com"))
        .unwrap_or(false);
    if is_linkedin && url.path().contains("/jobs/") {
        return Err(JobUrlError::LinkedInJobPosting);
    }

    Ok(url)
}
