use jiff::civil::Date;
use sea_orm::FromQueryResult;
use serde::Deserialize;

pub const MAX_RATING: f64 = 10.0;

#[derive(Clone, Debug, FromQueryResult)]
pub struct ActorAppearances {
    pub id: i32,
    pub name: String,
    pub gender: i32,
    pub image_url: Option<String>,
    pub appearances: i64,
}

#[derive(Clone, Debug, FromQueryResult)]
pub struct CollectionSummary {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub movie_count: i64,
}

/// One cast line on the details page; actor columns come from an outer join.
#[derive(Clone, Debug, FromQueryResult)]
pub struct CastRow {
    pub character: Option<String>,
    pub actor_name: Option<String>,
    pub actor_image: Option<String>,
}

/// A provider search hit offered for import.
#[derive(Clone, Debug)]
pub struct SearchCandidate {
    pub tmdb_id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MovieIdQuery {
    pub movie_id: i32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub watched_on: String,
}

/// Validated edit submission.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieEdit {
    pub rating: f64,
    /// `None` keeps the stored review.
    pub review: Option<String>,
    pub watched_on: Option<Date>,
}

impl EditForm {
    pub fn validate(&self) -> Result<MovieEdit, FieldErrors> {
        let mut errors = FieldErrors::default();

        let rating = match self.rating.trim() {
            "" => {
                errors.add("rating", "This field is required.");
                None
            },
            raw => match raw.parse::<f64>() {
                Ok(r) if r.is_finite() && (0.0..=MAX_RATING).contains(&r) => Some(r),
                Ok(_) => {
                    errors.add("rating", "Rating must be between 0 and 10.");
                    None
                },
                Err(_) => {
                    errors.add("rating", "Not a valid number.");
                    None
                },
            },
        };

        let watched_on = match self.watched_on.trim() {
            "" => None,
            raw => match raw.parse::<Date>() {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("watched_on", "Not a valid date value.");
                    None
                },
            },
        };

        let review = self.review.trim();
        let review = (!review.is_empty()).then(|| review.to_string());

        match rating {
            Some(rating) if errors.is_empty() => Ok(MovieEdit { rating, review, watched_on }),
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub title: String,
}

impl AddForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let title = self.title.trim();
        if title.is_empty() {
            let mut errors = FieldErrors::default();
            errors.add("title", "This field is required.");
            return Err(errors);
        }
        Ok(title.to_string())
    }
}

/// Field name to message, in submission order.
#[derive(Clone, Debug, Default)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(rating: &str, review: &str, watched_on: &str) -> EditForm {
        EditForm {
            rating: rating.to_string(),
            review: review.to_string(),
            watched_on: watched_on.to_string(),
        }
    }

    #[test]
    fn accepts_full_edit() {
        let out = edit("7.5", "Loved it", "2024-05-01").validate().unwrap();
        assert_eq!(out.rating, 7.5);
        assert_eq!(out.review.as_deref(), Some("Loved it"));
        assert_eq!(out.watched_on, Some(jiff::civil::date(2024, 5, 1)));
    }

    #[test]
    fn blank_review_and_date_are_absent() {
        let out = edit("8", "   ", "").validate().unwrap();
        assert_eq!(out.review, None);
        assert_eq!(out.watched_on, None);
    }

    #[test]
    fn rating_is_required() {
        let errors = edit("", "", "").validate().unwrap_err();
        assert_eq!(errors.get("rating"), Some("This field is required."));
        assert_eq!(errors.get("watched_on"), None);
    }

    #[test]
    fn rejects_bad_rating_and_date_together() {
        let errors = edit("eleven", "", "01/05/2024").validate().unwrap_err();
        assert_eq!(errors.get("rating"), Some("Not a valid number."));
        assert_eq!(errors.get("watched_on"), Some("Not a valid date value."));

        let errors = edit("10.5", "", "").validate().unwrap_err();
        assert_eq!(errors.get("rating"), Some("Rating must be between 0 and 10."));
    }

    #[test]
    fn add_form_trims_title() {
        let form = AddForm { title: "  The Matrix ".to_string() };
        assert_eq!(form.validate().unwrap(), "The Matrix");

        let empty = AddForm { title: " ".to_string() };
        assert!(empty.validate().unwrap_err().get("title").is_some());
    }
}
