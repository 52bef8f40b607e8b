use crate::{
    client::Client,
    error::{ErrorKind, Result},
    extract,
};
use url::Url;

const DOCUMENT_FILE_NAME: &str = "README.md";
const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";

/// Rewrite a project's canonical address into the address of its raw README
/// on the given branch.
///
/// For GitHub projects the hosting domain is swapped for the raw-content
/// domain; other hosts keep theirs. Either way the branch and the document
/// file name are appended as path segments.
pub fn raw_document_url(project_base_url: &str, branch: &str) -> Result<Url> {
    let mut url = Url::parse(project_base_url)
        .map_err(|e| ErrorKind::UrlParseError(project_base_url.to_string(), e))?;

    if url.host_str() == Some("github.com") {
        url.set_host(Some(RAW_CONTENT_HOST))
            .map_err(|_| ErrorKind::InvalidBaseUrl(project_base_url.to_string()))?;
    }

    url.path_segments_mut()
        .map_err(|_| ErrorKind::InvalidBaseUrl(project_base_url.to_string()))?
        .pop_if_empty()
        .push(branch)
        .push(DOCUMENT_FILE_NAME);

    Ok(url)
}

/// Retrieve the raw README of a project. A transport failure or a non-success
/// response surfaces as an error; there is deliberately no retry at this
/// layer, so a failing fetch aborts the check for this one document.
pub async fn fetch_document(client: &Client, project_base_url: &str, branch: &str) -> Result<String> {
    let url = raw_document_url(project_base_url, branch)?;
    fetch_page(client, url.as_str()).await
}

/// Retrieve an arbitrary page as text over the shared client
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let fetch_err = |source| ErrorKind::DocumentFetch {
        url: url.to_string(),
        source,
    };

    let response = client.raw_client().get(url).send().await.map_err(fetch_err)?;
    let response = response.error_for_status().map_err(fetch_err)?;
    response.text().await.map_err(fetch_err)
}

/// Fetch a project's README and extract its link targets
pub async fn collect_links(
    client: &Client,
    project_base_url: &str,
    branch: &str,
) -> Result<Vec<String>> {
    let content = fetch_document(client, project_base_url, branch).await?;
    Ok(extract::extract_markdown_links(
        &content,
        project_base_url,
        branch,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ClientBuilder;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_raw_document_url_github() {
        let url = raw_document_url("https://github.com/user/project", "main").unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/user/project/main/README.md"
        );
    }

    #[test]
    fn test_raw_document_url_trailing_slash() {
        let url = raw_document_url("https://github.com/user/project/", "master").unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/user/project/master/README.md"
        );
    }

    #[test]
    fn test_raw_document_url_keeps_other_hosts() {
        let url = raw_document_url("http://127.0.0.1:8080", "main").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/main/README.md");
    }

    #[test]
    fn test_raw_document_url_rejects_garbage() {
        assert!(matches!(
            raw_document_url("not a url", "main"),
            Err(ErrorKind::UrlParseError(_, _))
        ));
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Title"))
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default().build().unwrap();
        let content = fetch_document(&client, &mock_server.uri(), "main")
            .await
            .unwrap();
        assert_eq!(content, "# Title");
    }

    #[tokio::test]
    async fn test_fetch_document_missing_is_fatal() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default().build().unwrap();
        let result = fetch_document(&client, &mock_server.uri(), "main").await;
        assert!(matches!(result, Err(ErrorKind::DocumentFetch { .. })));
    }

    #[tokio::test]
    async fn test_collect_links_resolves_against_project_base() {
        let mock_server = MockServer::start().await;
        let readme = "[Google](https://www.google.com) and [Local](/Local)";
        Mock::given(method("GET"))
            .and(path("/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string(readme))
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default().build().unwrap();
        let links = collect_links(&client, &mock_server.uri(), "main")
            .await
            .unwrap();
        assert_eq!(
            links,
            vec![
                "https://www.google.com".to_string(),
                format!("{}/blob/main/Local", mock_server.uri()),
            ]
        );
    }
}
