use super::environment::LaunchSite;
use super::forecast_errors::ForecastError;
use super::profile::{AtmosphericProfile, ProfileLevel};
use chrono::{DateTime, Duration, DurationRound, Utc};
use csv::ReaderBuilder;
use hifitime::Epoch;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CACHE_DURATION_HOURS: i64 = 6; // GFS runs every 6 hours
const CACHE_DIR: &str = "raidersim";
const OPEN_METEO_GFS_URL: &str = "https://api.open-meteo.com/v1/gfs";
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// GFS pressure levels requested from the provider (hPa).
const PRESSURE_LEVELS_HPA: [u32; 19] = [
    1000, 975, 950, 925, 900, 850, 800, 700, 600, 500, 400, 300, 250, 200, 150, 100, 70, 50, 30,
];

/// Source of gridded atmospheric forecasts for a launch site.
///
/// Each call makes a single attempt and never retries. A failed fetch is final
/// for the run.
pub trait ForecastProvider {
    /// Short name recorded in the environment descriptor, e.g. `"GFS"`.
    fn source(&self) -> &str;

    fn fetch(&self, site: &LaunchSite, epoch: Epoch) -> Result<AtmosphericProfile, ForecastError>;
}

/// Provider used when forecasts are turned off; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl ForecastProvider for OfflineProvider {
    fn source(&self) -> &str {
        "offline"
    }

    fn fetch(&self, _site: &LaunchSite, _epoch: Epoch) -> Result<AtmosphericProfile, ForecastError> {
        Err(ForecastError::Disabled)
    }
}

/// NOAA GFS pressure-level forecast served by the Open-Meteo API, cached on disk.
pub struct GfsForecastProvider {
    base_url: String,
    cache_dir: PathBuf,
}

impl Default for GfsForecastProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GfsForecastProvider {
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_DIR);

        Self {
            base_url: OPEN_METEO_GFS_URL.to_string(),
            cache_dir,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    fn cache_path(&self, site: &LaunchSite, hour: &DateTime<Utc>) -> PathBuf {
        self.cache_dir.join(format!(
            "gfs_{:.3}_{:.3}_{}.csv",
            site.latitude,
            site.longitude,
            hour.format("%Y%m%d%H")
        ))
    }

    fn request_url(&self, site: &LaunchSite, hour_key: &str) -> String {
        let hourly: Vec<String> = PRESSURE_LEVELS_HPA
            .iter()
            .flat_map(|level| {
                [
                    format!("temperature_{level}hPa"),
                    format!("geopotential_height_{level}hPa"),
                    format!("wind_speed_{level}hPa"),
                    format!("wind_direction_{level}hPa"),
                ]
            })
            .collect();

        format!(
            "{}?latitude={}&longitude={}&hourly={}&start_hour={hour_key}&end_hour={hour_key}\
             &wind_speed_unit=ms&timezone=GMT&format=csv",
            self.base_url,
            site.latitude,
            site.longitude,
            hourly.join(",")
        )
    }

    /// Returns the cached CSV if it is younger than the forecast cycle.
    fn read_fresh_cache(&self, path: &Path) -> Option<Vec<u8>> {
        let modified: DateTime<Utc> = fs::metadata(path).ok()?.modified().ok()?.into();
        if Utc::now() - modified > Duration::hours(CACHE_DURATION_HOURS) {
            debug!(path = %path.display(), "forecast cache is stale");
            return None;
        }
        fs::read(path).ok()
    }

    /// Downloads the forecast once; no retry.
    fn download(&self, url: &str) -> Result<Vec<u8>, ForecastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        let response = client.get(url).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(ForecastError::HttpStatus(status.as_u16()));
        }

        Ok(response.bytes()?.to_vec())
    }

    /// Only a forecast that parses is written to the cache. A cache that cannot
    /// be written does not discard the downloaded profile.
    fn parse_and_cache(
        &self,
        data: &[u8],
        hour_key: &str,
        cache_path: &Path,
    ) -> Result<AtmosphericProfile, ForecastError> {
        let profile = parse_open_meteo_csv(data, hour_key)?;

        if let Err(err) = fs::create_dir_all(&self.cache_dir).and_then(|_| fs::write(cache_path, data)) {
            warn!(path = %cache_path.display(), error = %err, "could not cache GFS forecast");
        }
        Ok(profile)
    }
}

impl ForecastProvider for GfsForecastProvider {
    fn source(&self) -> &str {
        "GFS"
    }

    fn fetch(&self, site: &LaunchSite, epoch: Epoch) -> Result<AtmosphericProfile, ForecastError> {
        let hour = forecast_hour(epoch)?;
        let hour_key = hour.format("%Y-%m-%dT%H:%M").to_string();
        let cache_path = self.cache_path(site, &hour);

        if let Some(data) = self.read_fresh_cache(&cache_path) {
            info!(path = %cache_path.display(), "using cached GFS forecast");
            return parse_open_meteo_csv(&data, &hour_key);
        }

        let url = self.request_url(site, &hour_key);
        info!(%hour_key, "fetching GFS forecast");
        let data = self.download(&url)?;
        debug!(bytes = data.len(), "downloaded GFS forecast");
        self.parse_and_cache(&data, &hour_key, &cache_path)
    }
}

/// Launch epoch rounded down to the forecast's hourly grid.
fn forecast_hour(epoch: Epoch) -> Result<DateTime<Utc>, ForecastError> {
    let seconds = epoch.to_unix_seconds().floor() as i64;
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .and_then(|t| t.duration_trunc(Duration::hours(1)).ok())
        .ok_or_else(|| ForecastError::MissingForecastData(format!("epoch {epoch} out of range")))
}

/// Parses Open-Meteo CSV output: a location preamble, a blank line, then an
/// hourly table whose header names columns like `temperature_850hPa (°C)`.
pub(crate) fn parse_open_meteo_csv(
    data: &[u8],
    hour_key: &str,
) -> Result<AtmosphericProfile, ForecastError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut columns: Option<HashMap<String, usize>> = None;
    let mut row = None;

    for result in rdr.records() {
        let record = result?;
        match record.get(0) {
            Some("time") => {
                columns = Some(
                    record
                        .iter()
                        .enumerate()
                        .map(|(i, name)| {
                            let key = name.split(" (").next().unwrap_or(name).trim();
                            (key.to_string(), i)
                        })
                        .collect(),
                );
            }
            Some(time) if columns.is_some() && time.starts_with(hour_key) => {
                row = Some(record);
                break;
            }
            _ => {}
        }
    }

    let columns = columns
        .ok_or_else(|| ForecastError::MissingForecastData("hourly header".to_string()))?;
    let row = row.ok_or_else(|| ForecastError::MissingForecastData(format!("hour {hour_key}")))?;

    let value = |name: String| -> Result<Option<f64>, ForecastError> {
        match columns.get(&name).and_then(|&i| row.get(i)).map(str::trim) {
            Some(text) if !text.is_empty() => Ok(Some(text.parse::<f64>()?)),
            _ => Ok(None),
        }
    };

    let mut levels = Vec::with_capacity(PRESSURE_LEVELS_HPA.len());
    for level in PRESSURE_LEVELS_HPA {
        let fields = (
            value(format!("geopotential_height_{level}hPa"))?,
            value(format!("temperature_{level}hPa"))?,
            value(format!("wind_speed_{level}hPa"))?,
            value(format!("wind_direction_{level}hPa"))?,
        );
        if let (Some(height), Some(temperature_c), Some(speed), Some(direction)) = fields {
            levels.push(ProfileLevel::from_wind_direction(
                height,
                level as f64 * 100.0,
                temperature_c + 273.15,
                speed,
                direction,
            ));
        }
    }

    AtmosphericProfile::new(levels)
}
