// ============================================================================
// API Client : stockscan
// ============================================================================
// Récupère les chandelles historiques depuis le service de graphiques
// stockscan pour l'instrument fixe du déploiement (TSLA sur NASDAQ)
//
// Endpoint : GET /candle/v3/{symbol}/{timeFrame}/{exchange}
// Corps    : { "candles": [ { "date": string, "close": string|number, ... } ] }
// ============================================================================

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::models::{RawCandle, TimeFrame};

/// Symbole de l'instrument, fixe pour ce déploiement
pub const SYMBOL: &str = "TSLA";

/// Place de cotation, fixe pour ce déploiement
pub const EXCHANGE: &str = "NASDAQ";

/// Base de l'endpoint chandelles du service
const BASE_URL: &str = "https://chart.stockscan.io/candle/v3";

// ============================================================================
// FetchError : taxonomie des échecs de fetch
// ============================================================================
// CONCEPT : Erreurs typées par cause
// - Network : échec de transport, aucune réponse reçue
// - Status : le service a répondu mais hors 2xx
// - MalformedBody : corps sans le champ `candles` attendu
// Un tableau `candles` vide n'est PAS une erreur : il est propagé en
// résultat vide ("pas de données")
// ============================================================================

/// Échec d'une récupération de chandelles
#[derive(Debug, Error)]
pub enum FetchError {
    /// Échec réseau : la requête n'a pas abouti
    #[error("Échec de la requête vers le service de cotation : {0}")]
    Network(#[from] reqwest::Error),

    /// Le service a retourné un statut hors 2xx
    #[error("Le service de cotation a retourné une erreur : HTTP {0}")]
    Status(StatusCode),

    /// Corps de réponse illisible (champ `candles` absent ou JSON invalide)
    #[error("Réponse du service de cotation illisible : {0}")]
    MalformedBody(String),
}

// ============================================================================
// Structure de la réponse JSON
// ============================================================================

/// Corps de réponse de l'endpoint chandelles
///
/// Seul le tableau `candles` nous intéresse ; serde ignore le reste
#[derive(Debug, Deserialize)]
struct CandleResponse {
    candles: Vec<RawCandle>,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Récupère les chandelles brutes pour un (symbole, time-frame)
///
/// Une seule requête, pas de retry, pas de timeout au-delà des défauts
/// du transport : l'échec remonte immédiatement à l'appelant.
///
/// # Retourne
/// * `Ok(candles)` - tableau brut, éventuellement vide ("pas de données")
/// * `Err(FetchError)` - échec réseau, statut hors 2xx ou corps illisible
#[instrument(skip(time_frame), fields(time_frame = %time_frame.label()))]
pub async fn fetch_candles(
    symbol: &str,
    time_frame: TimeFrame,
) -> Result<Vec<RawCandle>, FetchError> {
    let url = build_candle_url(symbol, time_frame);
    debug!(url = %url, "Built candle service URL");

    // User-Agent de navigateur pour éviter le blocage du service
    let client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()?;

    debug!("Sending HTTP request to candle service");
    let response = client.get(&url).send().await?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        error!(status = %status, "Candle service returned error status");
        return Err(FetchError::Status(status));
    }

    // On lit le corps en texte puis on décode nous-mêmes, pour
    // distinguer un corps illisible d'un échec de transport
    let body = response.text().await?;
    let candles = decode_body(&body)?;

    info!(candles = candles.len(), "Fetched raw candles");
    Ok(candles)
}

/// Construit l'URL de l'endpoint chandelles
///
/// Format : {base}/{symbol}/{timeFrame}/{exchange}
fn build_candle_url(symbol: &str, time_frame: TimeFrame) -> String {
    format!(
        "{}/{}/{}/{}",
        BASE_URL,
        symbol,
        time_frame.path_segment(),
        EXCHANGE
    )
}

/// Décode le corps JSON en tableau de chandelles brutes
///
/// Un corps sans champ `candles` (ou non-JSON) est un MalformedBody ;
/// un tableau vide est un résultat valide
fn decode_body(body: &str) -> Result<Vec<RawCandle>, FetchError> {
    let response: CandleResponse =
        serde_json::from_str(body).map_err(|e| FetchError::MalformedBody(e.to_string()))?;
    Ok(response.candles)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_candle_url() {
        let url = build_candle_url("TSLA", TimeFrame::Daily);
        assert_eq!(url, "https://chart.stockscan.io/candle/v3/TSLA/daily/NASDAQ");

        let url = build_candle_url("TSLA", TimeFrame::Hourly);
        assert!(url.contains("/hourly/"));
    }

    #[test]
    fn test_decode_body_valid() {
        let body = r#"{
            "candles": [
                {"date": "2024-01-01", "close": "250.5"},
                {"date": "2024-01-02", "close": 251.75, "open": 249.0}
            ]
        }"#;

        let candles = decode_body(body).unwrap();
        assert_eq!(candles.len(), 2);
    }

    #[test]
    fn test_decode_body_empty_candles_is_ok() {
        // Tableau vide = "pas de données", pas une erreur
        let candles = decode_body(r#"{"candles": []}"#).unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn test_decode_body_missing_candles_field() {
        let result = decode_body(r#"{"quotes": []}"#);
        assert!(matches!(result, Err(FetchError::MalformedBody(_))));
    }

    #[test]
    fn test_decode_body_not_json() {
        let result = decode_body("<html>503 Service Unavailable</html>");
        assert!(matches!(result, Err(FetchError::MalformedBody(_))));
    }

    #[test]
    fn test_decode_body_candles_with_missing_fields() {
        // Les champs absents ne font pas échouer le décodage du corps :
        // c'est la normalisation qui écartera ces chandelles
        let body = r#"{"candles": [{"date": "2024-01-01"}, {"close": 100}]}"#;
        let candles = decode_body(body).unwrap();
        assert_eq!(candles.len(), 2);
    }

    // Test avec un vrai appel API (peut échouer si pas de connexion)
    #[tokio::test]
    async fn test_fetch_candles_live() {
        match fetch_candles(SYMBOL, TimeFrame::Daily).await {
            Ok(candles) => {
                println!("✓ Récupéré {} chandelles pour {}", candles.len(), SYMBOL);
            }
            Err(e) => {
                println!("⚠ Test skippé (pas de connexion?) : {}", e);
            }
        }
    }
}
