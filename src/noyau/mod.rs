//! Noyau intégrales (calcul pur, aucune dépendance UI)
//!
//! Organisation interne :
//! - jetons.rs     : tokenisation
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST réel + évaluation f64
//! - fonction.rs   : fonction compilée (texte -> AST, une fois)
//! - erreurs.rs    : erreurs typées (analyse, domaine, bornes, ...)
//! - domaine.rs    : balayage du domaine (points invalides, zones suspectes)
//! - riemann.rs    : sommes de Riemann (gauche, droite, milieu, trapèze)
//! - quadrature.rs : référence “exacte” (Gauss-Kronrod adaptatif)
//! - integrale.rs  : demande / bilan + pipeline integrer()
//! - format.rs     : formats d'affichage des valeurs et écarts

pub mod domaine;
pub mod erreurs;
pub mod expr;
pub mod fonction;
pub mod format;
pub mod integrale;
pub mod jetons;
pub mod quadrature;
pub mod riemann;
pub mod rpn;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale : exactement ce que la couche app consomme
pub use domaine::RapportDomaine;
pub use erreurs::ErreurIntegrale;
pub use fonction::Fonction;
pub use integrale::{
    integrer, valider_subdivisions, BilanIntegration, DemandeIntegration, Intervalle, Methode,
};
pub use riemann::{ProfilTranche, Variante};
