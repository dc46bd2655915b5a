use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub report_service_url: String,
    pub artifact_base_url: String,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let report_service_url = env::var("REPORT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        Self {
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("APP_PORT must be a number"),
            environment: env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            artifact_base_url: env::var("ARTIFACT_BASE_URL")
                .unwrap_or_else(|_| report_service_url.clone()),
            report_service_url,
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "report-delivery".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str) -> Config {
        Config {
            port: 8080,
            environment: environment.to_string(),
            report_service_url: "http://localhost:8000".to_string(),
            artifact_base_url: "http://localhost:8000".to_string(),
            otel_service_name: "report-delivery".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
        }
    }

    #[test]
    fn test_is_production() {
        assert!(config("production").is_production());
        assert!(!config("development").is_production());
        assert!(!config("staging").is_production());
    }
}
