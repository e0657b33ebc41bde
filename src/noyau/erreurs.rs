// src/noyau/erreurs.rs
//
// Erreurs typées du noyau.
// - ErreurDomaine   : pourquoi f(x) n'est pas définie en un point
// - ErreurIntegrale : tout ce qu'une demande d'intégration peut refuser
//
// Les étages internes (jetons, rpn) restent en Result<_, String>; la frontière
// Fonction::compiler enveloppe ces messages dans ErreurIntegrale::Analyse.

use thiserror::Error;

/// Cause d'échec d'évaluation en un point donné.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErreurDomaine {
    #[error("division par zéro")]
    DivisionParZero,

    #[error("racine carrée d'un nombre négatif")]
    RacineDeNegatif,

    #[error("logarithme d'un nombre non strictement positif")]
    LogDeNonPositif,

    #[error("puissance non définie (base négative et exposant non entier)")]
    PuissanceIndefinie,

    #[error("débordement flottant (valeur infinie)")]
    Debordement,

    #[error("forme indéterminée (NaN)")]
    Indetermine,
}

/// Erreur d'une demande d'intégration, de l'analyse au calcul.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErreurIntegrale {
    #[error("expression invalide : {0}")]
    Analyse(String),

    #[error("{cause} en x = {x}")]
    Domaine { x: f64, cause: ErreurDomaine },

    #[error("bornes invalides : {0}")]
    Bornes(String),

    #[error("nombre de subdivisions invalide : {0}")]
    Subdivisions(i64),

    #[error("quadrature : {0}")]
    Quadrature(String),
}

impl ErreurIntegrale {
    /// Enveloppe une cause de domaine avec le point fautif.
    pub fn domaine(x: f64, cause: ErreurDomaine) -> Self {
        ErreurIntegrale::Domaine { x, cause }
    }
}
