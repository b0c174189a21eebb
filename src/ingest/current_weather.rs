/// Current Weather Record Builder
///
/// Assembles a `WeatherRecord` from four HKO feeds, fetched one after the
/// other: English current conditions (`en`), Chinese current conditions
/// (`uc`), the Chinese multi-day outlook (`9d`) and the Chinese local
/// forecast (`td`). Any feed failure aborts the whole build.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::alert::weather_report::{WeatherMessage, format_weather_message};
use crate::endpoints::FeedEndpoints;
use crate::extract::{self, collapse_whitespace, extract};
use crate::ingest::hko_rss::{DocumentSource, FeedFragment, load_fragment};
use crate::logging::{self, DataSource};
use crate::model::{FeedError, WeatherRecord};

/// Builds weather records from a fixed set of feed endpoints.
pub struct WeatherChecker<'a> {
    endpoints: FeedEndpoints,
    source: &'a dyn DocumentSource,
    local_tz: Tz,
}

impl<'a> WeatherChecker<'a> {
    pub fn new(endpoints: FeedEndpoints, source: &'a dyn DocumentSource, local_tz: Tz) -> Self {
        Self {
            endpoints,
            source,
            local_tz,
        }
    }

    fn load(&self, key: &str, url: &str) -> Result<FeedFragment, FeedError> {
        let fragment = load_fragment(self.source, url)?;
        logging::debug(
            DataSource::Feed,
            Some(key),
            &format!("loaded {:?} from {}", fragment.envelope.title, url),
        );
        Ok(fragment)
    }

    /// Fetches all four feeds and builds a record, including the composed
    /// long-form message.
    pub fn current_weather(&self) -> Result<WeatherRecord, FeedError> {
        // --- English current conditions ---------------------------------
        let en = self.load("en", &self.endpoints.en)?;
        let en_text = en.text();

        let publication_date_text = en.envelope.pub_date.clone();
        let publication_date = DateTime::parse_from_rfc2822(&publication_date_text).map_err(|e| {
            FeedError::InvalidDate {
                text: publication_date_text.clone(),
                message: e.to_string(),
            }
        })?;

        let weather_img_url = en.first_image_src();
        let weather_img_number = extract(&extract::ICON_NUMBER, &weather_img_url);
        let temperature = extract(&extract::TEMPERATURE, &en_text);
        let relative_humidity = extract(&extract::RELATIVE_HUMIDITY, &en_text);
        let uv_index = extract(&extract::UV_INDEX, &en_text);
        let uv_level = extract(&extract::UV_LEVEL, &en_text);
        let rainfall_exist = !extract(&extract::RAINFALL_TABLE, &en_text).is_empty();

        if rainfall_exist {
            logging::debug(
                DataSource::Feed,
                Some("en"),
                &format!("regional rainfall reported ({} tables in bulletin)", en.table_count()),
            );
        }

        // --- Chinese current conditions ---------------------------------
        let uc = self.load("uc", &self.endpoints.uc)?;
        let prediction = extract(&extract::PREDICTION, &uc.text());
        let warning = uc.element_text_by_id("span", "warning_message");

        // --- Multi-day outlook ------------------------------------------
        let nine_day = self.load("9d", &self.endpoints.nine_day)?;
        let days_description =
            collapse_whitespace(&extract(&extract::DAYS_OUTLOOK, &nine_day.text()));

        // --- Local forecast ---------------------------------------------
        let td = self.load("td", &self.endpoints.td)?;
        let short_summary_msg = collapse_whitespace(&extract(&extract::TODAY_FORECAST, &td.text()));

        let long_summary_msg = format_weather_message(
            &WeatherMessage {
                temperature: &temperature,
                relative_humidity: &relative_humidity,
                uv_index: &uv_index,
                uv_level: &uv_level,
                warning: &warning,
                prediction: &prediction,
                days_description: &days_description,
                summary: &short_summary_msg,
            },
            publication_date,
            self.local_tz,
        );

        logging::info(
            DataSource::Feed,
            None,
            &format!(
                "weather record built: {}°C, {}% RH, published {}",
                temperature, relative_humidity, publication_date_text
            ),
        );

        Ok(WeatherRecord {
            author: en.envelope.author.clone(),
            publication_date,
            publication_date_text,
            weather_img_url,
            weather_img_number,
            temperature,
            relative_humidity,
            uv_index,
            uv_level,
            rainfall_exist,
            prediction,
            warning,
            days_description,
            short_summary_msg,
            long_summary_msg,
        })
    }
}
