use bookstore_http::error::AppError;
use bookstore_search::{BookQuery, NewBook};
use serde::Deserialize;

/// Query string of `GET /search`. Prices stay raw so parse failures can be
/// reported per parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "min-price")]
    pub min_price: Option<String>,
    #[serde(rename = "max-price")]
    pub max_price: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> Result<BookQuery, AppError> {
        let min_price = parse_price("min-price", self.min_price.as_deref())?;
        let max_price = parse_price("max-price", self.max_price.as_deref())?;

        Ok(BookQuery {
            title: self.title,
            author_name: self.author,
            min_price,
            max_price,
        })
    }
}

fn parse_price(param: &str, raw: Option<&str>) -> Result<f64, AppError> {
    let invalid = || {
        AppError::invalid_param(
            param,
            format!("invalid value for {param} query parameter"),
        )
    };

    let value: f64 = raw.ok_or_else(invalid)?.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Query string of `POST /book/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTitleParams {
    #[serde(default)]
    pub title: String,
}

/// Reject books whose required text fields are blank.
pub fn validate_new_book(book: &NewBook) -> Result<(), AppError> {
    let blank = [("title", &book.title), ("author_name", &book.author_name)]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

    match blank {
        Some((field, _)) => Err(AppError::invalid_param(
            field,
            format!("{field} must not be empty"),
        )),
        None => Ok(()),
    }
}
