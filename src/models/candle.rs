// ============================================================================
// Chandelles : RawCandle, PricePoint, PriceSeries
// ============================================================================
// Le service de cotation renvoie des chandelles brutes non fiables :
// champs manquants, prix non numériques, dates illisibles. La
// normalisation filtre et convertit ces enregistrements en une série
// de points prête à tracer.
//
// CONCEPT : Drop, never throw
// - Une chandelle corrompue est écartée individuellement
// - Elle ne doit jamais invalider le reste de la série
// ============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::warn;

use crate::models::TimeFrame;

// ============================================================================
// RawCandle : enregistrement brut du service
// ============================================================================

/// Une chandelle telle que reçue du service, avant validation
///
/// CONCEPT RUST : serde_json::Value pour les champs non fiables
/// - `close` arrive tantôt en nombre JSON, tantôt en string
/// - `date` doit être une string mais peut être n'importe quoi
/// - Les champs supplémentaires (open, high, volume, ...) sont ignorés
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandle {
    /// Date/heure de la chandelle (string attendue, non garantie)
    #[serde(default)]
    pub date: Option<serde_json::Value>,

    /// Prix de clôture (nombre ou string, non garanti)
    #[serde(default)]
    pub close: Option<serde_json::Value>,
}

// ============================================================================
// PricePoint : enregistrement normalisé
// ============================================================================

/// Un point de la série de prix, prêt pour le rendu
///
/// Invariants : `price` est fini et positif ou nul ; `timestamp` est la
/// string de date d'origine et se re-parse en instant valide
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Date formatée pour l'axe X (ex: "Jan 01 24")
    pub display_date: String,

    /// Prix de clôture parsé
    pub price: f64,

    /// String de date d'origine, conservée pour les consommateurs
    /// qui voudraient re-parser l'instant exact
    pub timestamp: String,
}

// ============================================================================
// Parsing des champs non fiables
// ============================================================================

/// Parse le prix de clôture depuis sa valeur JSON brute
///
/// Accepte un nombre JSON ou une string numérique ; rejette tout le
/// reste, ainsi que les valeurs non finies ou négatives
fn parse_close(value: &serde_json::Value) -> Option<f64> {
    let price = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    // Invariant : prix fini et non négatif
    if !price.is_finite() || price < 0.0 {
        return None;
    }

    Some(price)
}

/// Parse la date brute en instant calendaire
///
/// Essaye les formats du plus précis au plus simple :
/// RFC 3339, datetime naïf (T ou espace), puis date seule
fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Valide une chandelle brute et la convertit en PricePoint
///
/// CONCEPT RUST : Option chaining avec ?
/// - Chaque étape peut échouer, ? court-circuite en None
/// - None = chandelle écartée (jamais d'erreur propagée)
fn point_from_raw(candle: &RawCandle) -> Option<PricePoint> {
    let price = parse_close(candle.close.as_ref()?)?;
    let raw_date = candle.date.as_ref()?.as_str()?;
    let instant = parse_instant(raw_date)?;

    Some(PricePoint {
        // Mois court invariant (anglais), jour et année sur 2 chiffres
        display_date: instant.format("%b %d %y").to_string(),
        price,
        timestamp: raw_date.to_string(),
    })
}

/// Normalise une séquence de chandelles brutes en points de prix
///
/// L'ordre d'entrée est préservé (supposé chronologique, pas de re-tri,
/// pas de dédoublonnage). Le résultat peut être vide : c'est un cas
/// valide ("pas de données"), distinct d'un échec de fetch.
pub fn normalize(raw: &[RawCandle]) -> Vec<PricePoint> {
    let total = raw.len();
    let mut dropped = 0;

    let points: Vec<PricePoint> = raw
        .iter()
        .filter_map(|candle| {
            let point = point_from_raw(candle);
            if point.is_none() {
                dropped += 1;
            }
            point
        })
        .collect();

    if dropped > 0 {
        warn!(dropped, total, "Dropped invalid candles during normalization");
    }

    points
}

// ============================================================================
// PriceSeries : série de points pour un time-frame
// ============================================================================

/// Série ordonnée de points de prix pour le time-frame actif
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// Time-frame pour lequel la série a été chargée
    pub time_frame: TimeFrame,

    /// Points dans l'ordre de la source
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Construit la série en normalisant les chandelles brutes
    pub fn from_raw(time_frame: TimeFrame, raw: &[RawCandle]) -> Self {
        Self {
            time_frame,
            points: normalize(raw),
        }
    }

    /// Retourne le nombre de points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Vérifie si la série est vide ("pas de données")
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Retourne le dernier point (le plus récent)
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Domaine de l'axe Y : [min(prix) − 5, max(prix) + 5]
    ///
    /// CONCEPT RUST : fold pour min/max en un seul passage
    pub fn price_domain(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }

        let (min, max) = self
            .points
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), p| {
                (min.min(p.price), max.max(p.price))
            });

        Some((min - 5.0, max + 5.0))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
