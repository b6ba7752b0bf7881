use std::fmt::Write as _;

use current_weather::WeatherData;

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass name for a wind direction in degrees.
pub fn compass_point(deg: u16) -> &'static str {
    // Each sector is 22.5° wide and centred on its heading.
    let sector = ((f64::from(deg % 360) + 11.25) / 22.5) as usize % 16;
    COMPASS[sector]
}

/// Multi-line summary for a terminal.
pub fn human(label: &str, data: &WeatherData) -> String {
    let main = &data.main;
    let wind = &data.wind;

    let mut out = String::new();
    let _ = writeln!(out, "Weather for {label}");
    let _ = writeln!(out, "  Temperature: {:.1}°C (feels like {:.1}°C)", main.temp, main.feels_like);
    let _ = writeln!(out, "  Min / Max:   {:.1}°C / {:.1}°C", main.temp_min, main.temp_max);
    let _ = writeln!(out, "  Humidity:    {}%", main.humidity);
    let _ = writeln!(out, "  Pressure:    {} hPa", main.pressure);
    let _ = write!(
        out,
        "  Wind:        {:.1} m/s from {} ({}°)",
        wind.speed,
        compass_point(wind.deg),
        wind.deg
    );
    out
}
