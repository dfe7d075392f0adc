use serde::Serialize;

use crate::core::{ApodDate, ApodRecord, PageOutcome};
use crate::error::AppError;

#[derive(Serialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
enum OutcomeJson<'a> {
    Image {
        #[serde(flatten)]
        record: &'a ApodRecord,
    },
    Video {
        date: ApodDate,
        title: Option<&'a str>,
        page_url: &'a str,
    },
}

pub(crate) fn output_outcome_json(date: ApodDate, outcome: &PageOutcome) -> Result<String, AppError> {
    let json = match outcome {
        PageOutcome::Image(record) => OutcomeJson::Image { record },
        PageOutcome::NoImage(signal) => OutcomeJson::Video {
            date,
            title: signal.title.as_deref(),
            page_url: &signal.page_url,
        },
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::Value;

    use super::*;
    use crate::core::NoImageSignal;

    fn date() -> ApodDate {
        ApodDate::from_ymd(2021, 1, 10, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).unwrap()
    }

    #[test]
    fn image_json_is_flat() {
        let outcome = PageOutcome::Image(ApodRecord {
            date: date(),
            title: "T".to_string(),
            explanation: "E".to_string(),
            compressed_image_url: "c".to_string(),
            full_res_image_url: "f".to_string(),
            page_url: "p".to_string(),
        });
        let value: Value = serde_json::from_str(&output_outcome_json(date(), &outcome).unwrap()).unwrap();
        assert_eq!(value["media_type"], "image");
        assert_eq!(value["date"], "2021-01-10");
        assert_eq!(value["title"], "T");
        assert_eq!(value["full_res_image_url"], "f");
    }

    #[test]
    fn video_json_has_page_url() {
        let outcome = PageOutcome::NoImage(NoImageSignal {
            page_url: "https://apod.nasa.gov/apod/ap210110.html".to_string(),
            title: Some("Sunset Eclipse Timelapse".to_string()),
        });
        let value: Value = serde_json::from_str(&output_outcome_json(date(), &outcome).unwrap()).unwrap();
        assert_eq!(value["media_type"], "video");
        assert_eq!(value["page_url"], "https://apod.nasa.gov/apod/ap210110.html");
        assert_eq!(value["title"], "Sunset Eclipse Timelapse");
    }
}
