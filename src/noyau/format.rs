// src/noyau/format.rs

/* ------------------------ Formats d'affichage ------------------------ */

/// Valeur d'intégrale : 6 décimales fixes, le format des corrigés du cours.
pub fn format_valeur(v: f64) -> String {
    format!("{v:.6}")
}

/// Écart relatif en pourcentage : 4 décimales.
pub fn format_pourcentage(relatif: f64) -> String {
    format!("{:.4} %", relatif * 100.0)
}

/// Erreur estimée (quadrature) : notation scientifique courte.
pub fn format_erreur_estimee(e: f64) -> String {
    format!("{e:.3e}")
}

/// Borne / abscisse : forme minimale qui re-parse à l'identique
/// ("0.5" reste "0.5", "3" reste "3").
pub fn format_borne(v: f64) -> String {
    format!("{v}")
}

/// Segment [a, b] dans l'ordre saisi par l'utilisateur.
pub fn format_segment(a: f64, b: f64, inverse: bool) -> String {
    if inverse {
        format!("de {} à {}", format_borne(b), format_borne(a))
    } else {
        format!("de {} à {}", format_borne(a), format_borne(b))
    }
}
