//! Reply composition. Pure functions of the gathered data; the only
//! output is the message text.

use crate::config::{
    self, Config, INFO_TEXT_LENGTH, PROJECT_HOMEPAGE, PROJECT_NAME, PROJECT_VERSION,
};
use crate::model::{Geometry, Place, WeatherSeries};
use crate::slack::Message;

/// Weather emoji for the current precipitation intensity.
pub fn weather_icon(rainfall: f64) -> &'static str {
    if rainfall == 0.0 {
        "☀️"
    } else if rainfall < 4.0 {
        "🌦️"
    } else {
        "🌧️"
    }
}

/// Cut the buildings summary at a raw character index; the caller
/// appends the ellipsis unconditionally.
pub fn truncate_info(text: &str, cap: usize) -> String {
    if text.chars().count() < cap {
        text.to_string()
    } else {
        text.chars().take(cap).collect()
    }
}

/// Assemble the channel-visible rain report.
pub fn compose(
    config: &Config,
    place: &Place,
    series: &WeatherSeries,
    chart_url: &str,
    map_url: &str,
    geo: &Geometry,
) -> Message {
    let current = series.current();
    let after1h = series.after_one_hour();

    let icon = weather_icon(current.rainfall);
    let rain = format!(
        "{} の 降水強度 {} mm/h ⇒ {} mm/h",
        current.at.format("%-H:%M"),
        current.rainfall,
        after1h.rainfall,
    );
    let info = format!("🏙 {}...", truncate_info(&place.buildings, INFO_TEXT_LENGTH));

    let chart = format!("<{chart_url}| >");
    let map = format!("<{map_url}| >");

    let detail = format!(
        "<https://weather.yahoo.co.jp/weather/zoomradar/?lon={}&lat={}&z={}|ウェブで詳しく見る>",
        geo.lon(),
        geo.lat(),
        config::MAP_ZOOM,
    );
    let credit =
        format!("{detail}  -  <https://developer.yahoo.co.jp/about|Web Services by Yahoo! JAPAN>");

    let project = format!("[<{PROJECT_HOMEPAGE}|{PROJECT_NAME} {PROJECT_VERSION}>]");
    let note = config.note.replace("{project}", &project);

    Message::in_channel(format!("{icon} {} {rain}\n{info}{chart}{map}{credit}\n{note}", place.area))
}
