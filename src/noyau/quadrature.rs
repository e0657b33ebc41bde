// src/noyau/quadrature.rs
//
// Intégrale de référence ("exacte") : Gauss-Kronrod G7K15 + bisection adaptative.
// La règle K15 évalue 15 points; la sous-règle G7 (les noeuds pairs) donne une
// deuxième estimation, et |K15 − G7| sert d'estimation d'erreur locale.
// On coupe toujours le segment le plus fautif en premier (tas max).
//
// Aucune évaluation aux extrémités : tous les noeuds sont intérieurs, ce qui
// tolère les bornes limites du domaine (ex: ln(x) dès x = 0).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::erreurs::ErreurIntegrale;
use super::fonction::Fonction;
use super::integrale::Intervalle;

/// Tolérances par défaut, même esprit que les routines quad scientifiques.
pub const TOLERANCE_ABS: f64 = 1e-10;
pub const TOLERANCE_REL: f64 = 1e-10;
/// Garde-fou anti-gel : nombre maximal de bisections.
pub const BISECTIONS_MAX: usize = 1000;

// Moitié positive des noeuds K15 (symétriques autour de 0) et leurs poids.
// Les noeuds d'indice pair forment la sous-règle G7.
const NOEUDS_K15: [f64; 8] = [
    0.0,
    0.207784955007898467600689403773245,
    0.405845151377397166906606412076961,
    0.586087235467691130294144838258730,
    0.741531185599394439863864773280788,
    0.864864423359769072789712788640926,
    0.949107912342758524526189684047851,
    0.991455371120812639206854697526329,
];

const POIDS_K15: [f64; 8] = [
    0.209482141084727828012999174891714,
    0.204432940075298892414161999234649,
    0.190350578064785409913256402421014,
    0.169004726639267902826583426598550,
    0.140653259715525918745189590510238,
    0.104790010322250183839876322541518,
    0.063092092629978553290700663189204,
    0.022935322010529224963732008058970,
];

const POIDS_G7: [f64; 4] = [
    0.417959183673469387755102040816327,
    0.381830050505118944950369775488975,
    0.279705391489276667901467771423780,
    0.129484966168869693270611432679082,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResultatQuadrature {
    pub valeur: f64,
    pub erreur_estimee: f64,
    pub evaluations: usize,
    pub segments: usize,
}

/// Un segment du découpage adaptatif, ordonné par erreur locale (tas max).
#[derive(Clone, Debug)]
struct Segment {
    a: f64,
    b: f64,
    valeur: f64,
    erreur: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.erreur == other.erreur
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        // les erreurs locales sont toujours finies (evaluer refuse inf/NaN)
        self.erreur.partial_cmp(&other.erreur).unwrap_or(Ordering::Equal)
    }
}

/// Applique K15 (et G7 en sous-produit) sur [a, b].
/// Retourne (valeur, erreur locale, nombre d'évaluations).
fn k15(f: &Fonction, a: f64, b: f64) -> Result<(f64, f64, usize), ErreurIntegrale> {
    let milieu = (a + b) / 2.0;
    let demi = (b - a) / 2.0;

    let eval =
        |x: f64| -> Result<f64, ErreurIntegrale> {
            f.evaluer(x).map_err(|cause| ErreurIntegrale::domaine(x, cause))
        };

    let f_centre = eval(milieu)?;
    let mut somme_k = POIDS_K15[0] * f_centre;
    let mut somme_g = POIDS_G7[0] * f_centre;
    let mut evaluations = 1usize;

    for i in 1..NOEUDS_K15.len() {
        let decalage = demi * NOEUDS_K15[i];
        let f_gauche = eval(milieu - decalage)?;
        let f_droite = eval(milieu + decalage)?;
        evaluations += 2;

        let paire = f_gauche + f_droite;
        somme_k += POIDS_K15[i] * paire;
        if i % 2 == 0 {
            somme_g += POIDS_G7[i / 2] * paire;
        }
    }

    let valeur = demi * somme_k;
    let erreur = (valeur - demi * somme_g).abs();
    Ok((valeur, erreur, evaluations))
}

/// Quadrature adaptative avec les tolérances par défaut.
pub fn quadrature(f: &Fonction, intervalle: &Intervalle) -> Result<ResultatQuadrature, ErreurIntegrale> {
    quadrature_bornee(f, intervalle, TOLERANCE_ABS, TOLERANCE_REL, BISECTIONS_MAX)
}

/// Quadrature adaptative, tolérances et budget explicites.
///
/// Convergée quand l'erreur totale passe sous max(tol_abs, tol_rel·|total|).
/// Budget épuisé sans convergence => `Quadrature`; point hors domaine
/// rencontré => `Domaine` avec l'abscisse fautive.
pub fn quadrature_bornee(
    f: &Fonction,
    intervalle: &Intervalle,
    tol_abs: f64,
    tol_rel: f64,
    bisections_max: usize,
) -> Result<ResultatQuadrature, ErreurIntegrale> {
    let mut tas: BinaryHeap<Segment> = BinaryHeap::new();

    let (valeur, erreur, evals) = k15(f, intervalle.a(), intervalle.b())?;
    tas.push(Segment {
        a: intervalle.a(),
        b: intervalle.b(),
        valeur,
        erreur,
    });

    let mut total = valeur;
    let mut erreur_totale = erreur;
    let mut evaluations = evals;

    let tolerance = |total: f64| tol_abs.max(tol_rel * total.abs());

    if erreur_totale <= tolerance(total) {
        return Ok(ResultatQuadrature {
            valeur: total,
            erreur_estimee: erreur_totale,
            evaluations,
            segments: 1,
        });
    }

    let mut bisections = 0usize;
    let mut convergee = false;

    while bisections < bisections_max {
        bisections += 1;

        let pire = match tas.pop() {
            Some(s) => s,
            None => break,
        };

        total -= pire.valeur;
        erreur_totale -= pire.erreur;

        let milieu = (pire.a + pire.b) / 2.0;

        let (v_gauche, e_gauche, n_gauche) = k15(f, pire.a, milieu)?;
        let (v_droite, e_droite, n_droite) = k15(f, milieu, pire.b)?;
        evaluations += n_gauche + n_droite;

        tas.push(Segment {
            a: pire.a,
            b: milieu,
            valeur: v_gauche,
            erreur: e_gauche,
        });
        tas.push(Segment {
            a: milieu,
            b: pire.b,
            valeur: v_droite,
            erreur: e_droite,
        });

        total += v_gauche + v_droite;
        erreur_totale += e_gauche + e_droite;

        if erreur_totale <= tolerance(total) {
            convergee = true;
            break;
        }
    }

    if !convergee && erreur_totale > tolerance(total) {
        return Err(ErreurIntegrale::Quadrature(format!(
            "pas de convergence après {} segments (erreur estimée {:.3e})",
            tas.len(),
            erreur_totale
        )));
    }

    Ok(ResultatQuadrature {
        valeur: total,
        erreur_estimee: erreur_totale,
        evaluations,
        segments: tas.len(),
    })
}
