//! Noyau — demande / bilan (pipeline d'intégration)
//!
//! Une DemandeIntegration entre, un BilanIntegration sort (ou une
//! ErreurIntegrale). Le bilan est autoporteur : la vue n'a rien d'autre à
//! connaître pour afficher résultats, avertissements, démarche et animation.
//!
//! Politique domaine : le balayage AVERTIT (notes) et ne bloque jamais;
//! un intégrateur qui évalue un point invalide échoue, lui, franchement.

use super::domaine::{scanner_domaine, RapportDomaine, ECHANTILLONS_DEFAUT};
use super::erreurs::ErreurIntegrale;
use super::fonction::Fonction;
use super::format::format_borne;
use super::quadrature::quadrature;
use super::riemann::{somme_riemann, Tranche, Variante, SUBDIVISIONS_MAX};

/// Bornes d'intégration validées. Toujours stockées ordonnées (a < b);
/// si l'utilisateur les a données décroissantes, `inverse` est vrai et le
/// résultat final change de signe (∫ de b à a = −∫ de a à b).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intervalle {
    a: f64,
    b: f64,
    inverse: bool,
}

impl Intervalle {
    pub fn nouveau(de: f64, vers: f64) -> Result<Self, ErreurIntegrale> {
        if !de.is_finite() || !vers.is_finite() {
            return Err(ErreurIntegrale::Bornes(
                "les bornes doivent être des nombres finis".into(),
            ));
        }
        if de == vers {
            return Err(ErreurIntegrale::Bornes(format!(
                "intervalle dégénéré (a = b = {de})"
            )));
        }

        if de < vers {
            Ok(Intervalle {
                a: de,
                b: vers,
                inverse: false,
            })
        } else {
            Ok(Intervalle {
                a: vers,
                b: de,
                inverse: true,
            })
        }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn largeur(&self) -> f64 {
        self.b - self.a
    }

    pub fn est_inverse(&self) -> bool {
        self.inverse
    }

    /// +1 ou −1 : facteur appliqué aux valeurs calculées sur [a, b] ordonné.
    pub fn signe(&self) -> f64 {
        if self.inverse {
            -1.0
        } else {
            1.0
        }
    }
}

/// Méthode demandée. Somme (union discriminée) plutôt qu'une hiérarchie :
/// le dispatch est un match, pas une table virtuelle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Methode {
    Exacte,
    Riemann {
        variante: Variante,
        subdivisions: u32,
    },
}

impl Methode {
    pub fn decrire(&self) -> String {
        match self {
            Methode::Exacte => "résolution exacte (quadrature adaptative)".to_string(),
            Methode::Riemann {
                variante,
                subdivisions,
            } => format!("somme de Riemann ({}), n = {}", variante.nom(), subdivisions),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DemandeIntegration {
    pub fonction: Fonction,
    pub intervalle: Intervalle,
    pub methode: Methode,
}

/// Écart entre l'approximation et la valeur de référence.
/// `relative` est None quand la référence vaut zéro (écart relatif sans objet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparaison {
    pub reference: f64,
    pub absolue: f64,
    pub relative: Option<f64>,
}

pub fn comparer(reference: f64, approche: f64) -> Comparaison {
    let absolue = (reference - approche).abs();
    let relative = if reference == 0.0 {
        None
    } else {
        Some(absolue / reference.abs())
    };
    Comparaison {
        reference,
        absolue,
        relative,
    }
}

/// Résultat complet d'une demande.
#[derive(Clone, Debug)]
pub struct BilanIntegration {
    pub fonction: Fonction,
    pub intervalle: Intervalle,
    pub methode: Methode,
    /// Valeur signée (bornes inversées déjà prises en compte).
    pub valeur: f64,
    /// Erreur estimée de la quadrature (méthode exacte seulement).
    pub erreur_estimee: Option<f64>,
    /// Une tranche par pas (méthodes de Riemann seulement) : l'animation.
    pub tranches: Vec<Tranche>,
    pub comparaison: Option<Comparaison>,
    pub rapport: RapportDomaine,
    /// Avertissements à montrer tels quels (domaine, bornes inversées, ...).
    pub notes: Vec<String>,
    /// Une ligne “comment ça a été calculé” pour le panneau démarche.
    pub note_calcul: String,
}

/// Porte de validation du nombre de subdivisions : accepte l'entrée signée
/// de l'utilisateur, refuse tout ce qui n'est pas 1 <= n <= SUBDIVISIONS_MAX.
pub fn valider_subdivisions(n: i64) -> Result<u32, ErreurIntegrale> {
    if n < 1 || n > i64::from(SUBDIVISIONS_MAX) {
        return Err(ErreurIntegrale::Subdivisions(n));
    }
    Ok(n as u32)
}

/// Pipeline complet : balayage du domaine (avertissements), dispatch sur la
/// méthode, comparaison à la référence quand elle est disponible.
pub fn integrer(demande: &DemandeIntegration) -> Result<BilanIntegration, ErreurIntegrale> {
    let fonction = &demande.fonction;
    let intervalle = &demande.intervalle;

    let rapport = scanner_domaine(fonction, intervalle, ECHANTILLONS_DEFAUT);
    let mut notes = notes_domaine(&rapport, intervalle);
    if intervalle.est_inverse() {
        notes.push(
            "bornes données dans l'ordre décroissant : le signe du résultat est inversé".into(),
        );
    }

    match demande.methode {
        Methode::Exacte => {
            let q = quadrature(fonction, intervalle)?;
            Ok(BilanIntegration {
                fonction: fonction.clone(),
                intervalle: *intervalle,
                methode: demande.methode,
                valeur: intervalle.signe() * q.valeur,
                erreur_estimee: Some(q.erreur_estimee),
                tranches: Vec::new(),
                comparaison: None,
                rapport,
                notes,
                note_calcul: format!(
                    "Gauss-Kronrod adaptatif : {} évaluations, {} segments, erreur estimée {:.3e}.",
                    q.evaluations, q.segments, q.erreur_estimee
                ),
            })
        }

        Methode::Riemann {
            variante,
            subdivisions,
        } => {
            let somme = somme_riemann(fonction, intervalle, subdivisions, variante)?;
            let valeur = intervalle.signe() * somme.valeur;

            // la référence est un confort : si la quadrature échoue, on garde
            // l'approximation et on explique pourquoi la comparaison manque
            let comparaison = match quadrature(fonction, intervalle) {
                Ok(q) => Some(comparer(intervalle.signe() * q.valeur, valeur)),
                Err(e) => {
                    notes.push(format!(
                        "référence exacte indisponible ({e}) : approximation seule"
                    ));
                    None
                }
            };

            let pas = intervalle.largeur() / f64::from(subdivisions);
            Ok(BilanIntegration {
                fonction: fonction.clone(),
                intervalle: *intervalle,
                methode: demande.methode,
                valeur,
                erreur_estimee: None,
                tranches: somme.tranches,
                comparaison,
                rapport,
                notes,
                note_calcul: format!(
                    "somme de Riemann ({}), n = {}, pas h = {}.",
                    variante.nom(),
                    subdivisions,
                    format_borne(pas)
                ),
            })
        }
    }
}

/// Avertissements issus du balayage, prêts à afficher.
fn notes_domaine(rapport: &RapportDomaine, intervalle: &Intervalle) -> Vec<String> {
    let mut notes = Vec::new();

    if !rapport.est_propre() {
        let exemple = rapport
            .invalides
            .first()
            .map(|p| format!(" (ex: {} en x = {})", p.cause, format_borne(p.x)))
            .unwrap_or_default();
        notes.push(format!(
            "attention : {} point(s) où f n'est pas définie dans [{}, {}]{exemple} : le résultat peut être faux",
            rapport.invalides_total,
            format_borne(intervalle.a()),
            format_borne(intervalle.b()),
        ));
    }

    if let Some((zg, zd)) = rapport.zones_invalides.first() {
        notes.push(format!(
            "f est indéfinie sur {} zone(s) entière(s), la première [{}, {}]",
            rapport.zones_invalides.len(),
            format_borne(*zg),
            format_borne(*zd),
        ));
    }

    if let Some((zg, zd)) = rapport.zones_suspectes.first() {
        notes.push(format!(
            "variations brutales près de x = {} : asymptote possible",
            format_borne((zg + zd) / 2.0),
        ));
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::erreurs::ErreurDomaine;

    fn demande(texte: &str, de: f64, vers: f64, methode: Methode) -> DemandeIntegration {
        DemandeIntegration {
            fonction: Fonction::compiler(texte, "x").unwrap(),
            intervalle: Intervalle::nouveau(de, vers).unwrap(),
            methode,
        }
    }

    #[test]
    fn pipeline_riemann_milieu_sur_x_carre() {
        let bilan = integrer(&demande(
            "x^2",
            0.0,
            3.0,
            Methode::Riemann {
                variante: Variante::Milieu,
                subdivisions: 1000,
            },
        ))
        .unwrap();

        assert!((bilan.valeur - 9.0).abs() < 1e-3);
        assert_eq!(bilan.tranches.len(), 1000);

        let cmp = bilan.comparaison.expect("référence attendue");
        assert!((cmp.reference - 9.0).abs() < 1e-9);
        assert!(cmp.absolue < 1e-3);
        let rel = cmp.relative.expect("référence non nulle");
        assert!(rel < 1e-3);
    }

    #[test]
    fn pipeline_exact_sans_tranches() {
        let bilan = integrer(&demande("sin(x)", 0.0, std::f64::consts::PI, Methode::Exacte)).unwrap();
        assert!((bilan.valeur - 2.0).abs() < 1e-10);
        assert!(bilan.tranches.is_empty());
        assert!(bilan.erreur_estimee.is_some());
        assert!(bilan.comparaison.is_none());
    }

    #[test]
    fn bornes_inversees_changent_le_signe() {
        let bilan = integrer(&demande(
            "x",
            1.0,
            0.0,
            Methode::Riemann {
                variante: Variante::Trapeze,
                subdivisions: 8,
            },
        ))
        .unwrap();

        assert!((bilan.valeur - (-0.5)).abs() < 1e-12);
        assert!(bilan.notes.iter().any(|n| n.contains("inversé")));

        // la référence est négociée dans la même orientation
        let cmp = bilan.comparaison.unwrap();
        assert!((cmp.reference - (-0.5)).abs() < 1e-10);
    }

    #[test]
    fn pipeline_milieu_bornes_inversees() {
        // de 3 à 0 : valeur et référence portent le même signe négatif,
        // les tranches restent celles de l'intervalle ordonné
        let bilan = integrer(&demande(
            "x^2",
            3.0,
            0.0,
            Methode::Riemann {
                variante: Variante::Milieu,
                subdivisions: 1000,
            },
        ))
        .unwrap();

        assert_eq!(bilan.tranches.len(), 1000);
        assert!((bilan.valeur - (-9.0)).abs() < 1e-3);

        let cmp = bilan.comparaison.unwrap();
        assert!((cmp.reference - (-9.0)).abs() < 1e-9);
        assert!(cmp.absolue < 1e-3);
    }

    #[test]
    fn bornes_degenerees_refusees() {
        let err = Intervalle::nouveau(2.0, 2.0).unwrap_err();
        assert!(matches!(err, ErreurIntegrale::Bornes(_)));

        let err = Intervalle::nouveau(f64::NAN, 1.0).unwrap_err();
        assert!(matches!(err, ErreurIntegrale::Bornes(_)));
    }

    #[test]
    fn porte_subdivisions() {
        assert_eq!(valider_subdivisions(10).unwrap(), 10);
        assert_eq!(valider_subdivisions(0).unwrap_err(), ErreurIntegrale::Subdivisions(0));
        assert_eq!(
            valider_subdivisions(-5).unwrap_err(),
            ErreurIntegrale::Subdivisions(-5)
        );
    }

    #[test]
    fn comparaison_reference_nulle_sans_relatif() {
        let cmp = comparer(0.0, 0.1);
        assert!((cmp.absolue - 0.1).abs() < 1e-15);
        assert!(cmp.relative.is_none());
    }

    #[test]
    fn pole_interieur_politique_avertir_et_continuer() {
        // milieu avec n pair ne tombe jamais sur x = 0 : la somme aboutit,
        // le rapport signale le pôle, la référence (quadrature) échoue en 0
        let bilan = integrer(&demande(
            "1/x",
            -1.0,
            1.0,
            Methode::Riemann {
                variante: Variante::Milieu,
                subdivisions: 10,
            },
        ))
        .unwrap();

        assert!(!bilan.rapport.est_propre());
        assert!(bilan
            .rapport
            .invalides
            .iter()
            .any(|p| p.x == 0.0 && p.cause == ErreurDomaine::DivisionParZero));
        assert!(bilan.comparaison.is_none());
        assert!(bilan.notes.iter().any(|n| n.contains("référence exacte indisponible")));
        // symétrie impaire : la somme s'annule presque exactement
        assert!(bilan.valeur.abs() < 1e-9);
    }
}
