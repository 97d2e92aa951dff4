//! Paging - query parsing and the page envelope

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use aps_crm::{Page, PageRequest, SortOrder};

use super::{
    CauseResponse, D177Response, F230Response, IbanResponse, OfflinePaymentResponse,
    SponsorshipResponse, UserResponse, VolunteerResponse,
};
use crate::error::ApiError;

/// Query string of every listing endpoint.
/// `sort` may repeat: `?sort=name,asc&sort=id,desc`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Free-text filter
    pub q: Option<String>,
    /// Zero-based page number
    pub page: Option<u32>,
    /// Page size (1..=10000)
    pub size: Option<u32>,
    /// `property[,asc|desc]`, repeatable
    pub sort: Option<Vec<String>>,
}

impl ListParams {
    /// Parse a raw query string, keeping every `sort` occurrence
    pub fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        let pairs: Vec<(String, String)> = match raw {
            Some(raw) => serde_urlencoded::from_str(raw)
                .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))?,
            None => Vec::new(),
        };

        let mut params = ListParams::default();
        let mut sort = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "q" => params.q = Some(value),
                "page" => params.page = Some(number(&key, &value)?),
                "size" => params.size = Some(number(&key, &value)?),
                "sort" => sort.push(value),
                _ => {}
            }
        }
        if !sort.is_empty() {
            params.sort = Some(sort);
        }
        Ok(params)
    }

    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn page_request(&self, default_size: u32) -> PageRequest {
        let sort = self
            .sort
            .iter()
            .flatten()
            .filter_map(|raw| SortOrder::parse(raw))
            .collect();
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(default_size),
            sort,
        )
    }
}

fn number(key: &str, value: &str) -> Result<u32, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Parametrul '{}' trebuie să fie numeric.", key)))
}

/// Page envelope returned by listing endpoints
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    UserPage = PageResponse<UserResponse>,
    VolunteerPage = PageResponse<VolunteerResponse>,
    CausePage = PageResponse<CauseResponse>,
    OfflinePaymentPage = PageResponse<OfflinePaymentResponse>,
    SponsorshipPage = PageResponse<SponsorshipResponse>,
    D177Page = PageResponse<D177Response>,
    F230Page = PageResponse<F230Response>,
    IbanPage = PageResponse<IbanResponse>
)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> PageResponse<T> {
    pub fn from_page<S>(page: Page<S>, convert: impl FnMut(S) -> T) -> Self {
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();
        let page = page.map(convert);
        Self {
            number_of_elements: page.content.len(),
            empty: page.content.is_empty(),
            total_elements: page.total_elements,
            total_pages,
            number: page.number,
            size: page.size,
            first,
            last,
            content: page.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aps_crm::Direction;

    #[test]
    fn test_repeated_sort_is_kept_in_order() {
        let params = ListParams::parse(Some("q=ana&page=2&size=5&sort=name,desc&sort=id")).unwrap();
        assert_eq!(params.query(), Some("ana"));
        let request = params.page_request(10);
        assert_eq!(request.page, 2);
        assert_eq!(request.size, 5);
        assert_eq!(request.sort.len(), 2);
        assert_eq!(request.sort[0].property, "name");
        assert_eq!(request.sort[0].direction, Direction::Desc);
        assert_eq!(request.sort[1].direction, Direction::Asc);
    }

    #[test]
    fn test_defaults_and_blank_query() {
        let params = ListParams::parse(Some("q=%20%20")).unwrap();
        assert_eq!(params.query(), None);
        let request = params.page_request(50);
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 50);
        assert!(request.sort.is_empty());

        assert!(ListParams::parse(None).unwrap().q.is_none());
    }

    #[test]
    fn test_non_numeric_page_is_rejected() {
        assert!(matches!(
            ListParams::parse(Some("page=abc")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_envelope_metadata() {
        let request = PageRequest::new(1, 2, vec![]);
        let page = Page::new(vec![3, 4], 5, &request);
        let response = PageResponse::from_page(page, |n| n * 10);
        assert_eq!(response.content, vec![30, 40]);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.number_of_elements, 2);
        assert!(!response.first);
        assert!(!response.last);
        assert!(!response.empty);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalElements"], 5);
        assert_eq!(json["numberOfElements"], 2);
    }
}
