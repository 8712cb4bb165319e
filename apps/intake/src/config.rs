use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Upper bound for the screening temperature.
pub const MAX_SCREENING_TEMPERATURE: f32 = 0.3;

/// Application configuration loaded from environment variables (and `.env`).
///
/// Read once at startup and handed to each component constructor.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub log_file: PathBuf,
    pub jd_path: PathBuf,
    pub prompt_path: PathBuf,
    pub cv_files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub screening_temperature: f32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let screening_temperature = or_default("INTAKE_SCREENING_TEMPERATURE", "0.3")
            .parse::<f32>()
            .context("INTAKE_SCREENING_TEMPERATURE must be a number")?;
        if !(0.0..=MAX_SCREENING_TEMPERATURE).contains(&screening_temperature) {
            bail!(
                "INTAKE_SCREENING_TEMPERATURE must be between 0.0 and {MAX_SCREENING_TEMPERATURE}, got {screening_temperature}"
            );
        }

        Ok(Config {
            gemini_api_key: require_var(&var, "GEMINI_API_KEY")?,
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_base_url: or_default("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            log_file: or_default("INTAKE_LOG_FILE", "log.json").into(),
            jd_path: or_default("INTAKE_JD_PATH", "sample_inputs/jd.txt").into(),
            prompt_path: or_default("INTAKE_PROMPT_PATH", "prompts/screening.md").into(),
            cv_files: parse_path_list(&or_default(
                "INTAKE_CV_FILES",
                "sample_inputs/cv1.txt,sample_inputs/cv2.txt,sample_inputs/cv3.txt",
            )),
            output_dir: or_default("INTAKE_OUTPUT_DIR", "outputs").into(),
            screening_temperature,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn require_var(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    var(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_path_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.gemini_api_key, "k");
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.log_file, PathBuf::from("log.json"));
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.cv_files.len(), 3);
        assert!((config.screening_temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_cv_file_list_is_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("INTAKE_CV_FILES", " a.txt , ,b.pdf"),
        ]))
        .unwrap();
        assert_eq!(
            config.cv_files,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.pdf")]
        );
    }

    #[test]
    fn test_screening_temperature_above_limit_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("INTAKE_SCREENING_TEMPERATURE", "0.7"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("INTAKE_SCREENING_TEMPERATURE"));
    }
}
