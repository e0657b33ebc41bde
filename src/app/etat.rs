//! src/app/etat.rs
//!
//! État UI (sans vue, sans calcul).
//!
//! Rôle : contenir l’état de l’atelier (saisies, méthode choisie, dernier
//! bilan, erreur, animation) et offrir des opérations simples (C/CLR/AC)
//! sans logique d’affichage.
//!
//! Contrats (Loi de Clément, version UI) :
//! - Aucune évaluation ici (pas de parsing, pas d’intégration) : l’état
//!   transporte les données, vue.rs appelle le noyau.
//! - Actions déterministes, sans effet de bord caché.
//! - Défense en profondeur : bornes sur les subdivisions.

use crate::noyau::riemann::SUBDIVISIONS_MAX;
use crate::noyau::{BilanIntegration, Variante};

/// Nombre de subdivisions proposé au lancement.
pub const SUBDIVISIONS_DEFAUT: u32 = 10;

const VARIABLE_DEFAUT: &str = "x";
const BORNE_A_DEFAUT: &str = "0";
const BORNE_B_DEFAUT: &str = "1";

/// Méthode demandée par l’utilisateur (l’onglet “Riemann” garde sa variante).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoixMethode {
    Exacte,
    Riemann,
}

#[derive(Clone, Debug)]
pub struct AppIntegrales {
    // --- entrée utilisateur ---
    pub entree: String,   // texte de f
    pub variable: String, // nom de la variable d’intégration
    pub borne_a: String,  // bornes telles que saisies (texte brut)
    pub borne_b: String,

    // --- méthode ---
    pub choix: ChoixMethode,
    pub variante: Variante,
    pub subdivisions: u32,

    // --- sorties ---
    pub bilan: Option<BilanIntegration>, // dernier calcul réussi
    pub erreur: String,                  // message d’erreur (si le pipeline échoue)

    // --- animation ---
    // Instant de départ (temps egui, en secondes) quand “Animer” est actif.
    pub animation: Option<f64>,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppIntegrales {
    fn default() -> Self {
        Self {
            entree: String::new(),
            variable: VARIABLE_DEFAUT.to_string(),
            borne_a: BORNE_A_DEFAUT.to_string(),
            borne_b: BORNE_B_DEFAUT.to_string(),
            choix: ChoixMethode::Riemann,
            variante: Variante::Milieu,
            subdivisions: SUBDIVISIONS_DEFAUT,
            bilan: None,
            erreur: String::new(),
            animation: None,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppIntegrales {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (saisies + méthode + résultats).
    pub fn reset_total(&mut self) {
        *self = Self::default();
    }

    /// C : effacer seulement l’entrée (sans toucher aux bornes ni aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultats + erreur + animation (sans toucher aux saisies).
    pub fn clear_resultats(&mut self) {
        self.bilan = None;
        self.erreur.clear();
        self.animation = None;
        self.focus_entree = true;
    }

    /// Utilitaire : placer une erreur.
    ///
    /// Choix UX :
    /// - On CONSERVE `bilan` (dernier calcul réussi) pour ne pas “effacer
    ///   l’écran” sur une faute de frappe.
    /// - On coupe l’animation (elle rejouerait un tracé périmé).
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.animation = None;
        self.focus_entree = true;
    }

    /// Utilitaire : déposer un bilan complet (et effacer l’erreur).
    pub fn set_bilan(&mut self, bilan: BilanIntegration) {
        self.erreur.clear();
        self.bilan = Some(bilan);
        self.animation = None;
        self.focus_entree = true;
    }

    /// Lance l’animation à l’instant `maintenant` (temps egui, secondes).
    /// Sans tranches (méthode exacte), il n’y a rien à rejouer.
    pub fn demarrer_animation(&mut self, maintenant: f64) {
        let a_des_tranches = self
            .bilan
            .as_ref()
            .map(|b| !b.tranches.is_empty())
            .unwrap_or(false);
        if a_des_tranches {
            self.animation = Some(maintenant);
        }
    }

    /// Garde-fou : borne les subdivisions (évite abus / gel plus tard).
    pub fn set_subdivisions(&mut self, n: u32) {
        self.subdivisions = n.clamp(1, SUBDIVISIONS_MAX);
    }
}
