// src/noyau/domaine.rs
//
// Balayage du domaine de f sur [a, b] AVANT intégration.
// Politique : avertir, ne jamais bloquer. Le rapport décrit ce qui a été vu;
// les intégrateurs échouent d'eux-mêmes s'ils évaluent un point invalide.
//
// Étapes:
// 1. extrémités a et b
// 2. grille uniforme dense (défaut 1000 points)
// 3. détection statistique de sauts (moyenne + 3·écart-type des |Δf|),
//    re-balayage fin (100 points) des intervalles suspects
// 4. points “ronds” (entiers, fractions j/i, π, e, √2, √3) ± tolérance

use super::erreurs::ErreurDomaine;
use super::fonction::Fonction;
use super::integrale::Intervalle;

pub const ECHANTILLONS_DEFAUT: usize = 1000;
pub const ECHANTILLONS_MIN: usize = 16;
pub const TOLERANCE_VOISINAGE: f64 = 1e-6;

const POINTS_RAFFINEMENT: usize = 100;
const DENOMINATEUR_MAX: i64 = 20;

// Garde-fous mémoire/temps sur les fonctions pathologiques.
const POINTS_STOCKES_MAX: usize = 64;
const ZONES_STOCKEES_MAX: usize = 64;
const RAFFINEMENTS_MAX: usize = 64;
const ENTIERS_MAX: f64 = 4096.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointInvalide {
    pub x: f64,
    pub cause: ErreurDomaine,
}

/// Résultat du balayage. `invalides` est plafonné; `invalides_total` compte
/// tout ce qui a été vu (les doublons exacts ne comptent qu'une fois).
#[derive(Clone, Debug, Default)]
pub struct RapportDomaine {
    pub echantillons: usize,
    pub invalides: Vec<PointInvalide>,
    pub invalides_total: usize,
    /// Échantillons de grille invalides consécutifs, fusionnés.
    pub zones_invalides: Vec<(f64, f64)>,
    /// Sauts brutaux restés finis après re-balayage (asymptote possible).
    pub zones_suspectes: Vec<(f64, f64)>,
}

impl RapportDomaine {
    pub fn est_propre(&self) -> bool {
        self.invalides_total == 0
    }

    fn note(&mut self, x: f64, cause: ErreurDomaine) {
        if self.invalides.iter().any(|p| p.x == x) {
            return;
        }
        self.invalides_total += 1;
        if self.invalides.len() < POINTS_STOCKES_MAX {
            self.invalides.push(PointInvalide { x, cause });
        }
    }
}

/// Balaye [a, b] et rapporte les points/zones où f n'est pas définie.
pub fn scanner_domaine(f: &Fonction, intervalle: &Intervalle, echantillons: usize) -> RapportDomaine {
    let n = echantillons.max(ECHANTILLONS_MIN);
    let (a, b) = (intervalle.a(), intervalle.b());

    let mut rapport = RapportDomaine {
        echantillons: n,
        ..Default::default()
    };

    // 1) Extrémités
    sonde(f, a, &mut rapport);
    sonde(f, b, &mut rapport);

    // 2) Grille uniforme (n points, style linspace : les deux bouts inclus)
    let pas = (b - a) / (n - 1) as f64;
    let mut valeurs: Vec<Option<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        // dernier point collé à b (dérive flottante)
        let x = if i + 1 == n { b } else { a + i as f64 * pas };
        match f.evaluer(x) {
            Ok(v) => valeurs.push(Some(v)),
            Err(cause) => {
                rapport.note(x, cause);
                valeurs.push(None);
            }
        }
    }

    fusionne_zones_invalides(&valeurs, a, pas, &mut rapport);

    // 3) Sauts brutaux : |Δf| au-delà de moyenne + 3·écart-type
    let diffs: Vec<(usize, f64)> = valeurs
        .windows(2)
        .enumerate()
        .filter_map(|(i, w)| match (w[0], w[1]) {
            (Some(v0), Some(v1)) => Some((i, (v1 - v0).abs())),
            _ => None,
        })
        .collect();

    if diffs.len() >= 2 {
        let moyenne = diffs.iter().map(|(_, d)| d).sum::<f64>() / diffs.len() as f64;
        let variance = diffs
            .iter()
            .map(|(_, d)| (d - moyenne) * (d - moyenne))
            .sum::<f64>()
            / diffs.len() as f64;
        let seuil = moyenne + 3.0 * variance.sqrt();

        let mut raffinements = 0usize;
        for (i, d) in &diffs {
            if *d <= seuil {
                continue;
            }
            if raffinements >= RAFFINEMENTS_MAX {
                break;
            }
            raffinements += 1;

            let x_gauche = a + *i as f64 * pas;
            let x_droite = x_gauche + pas;
            let mut trouve = false;
            for k in 0..POINTS_RAFFINEMENT {
                let t = k as f64 / (POINTS_RAFFINEMENT - 1) as f64;
                let x = x_gauche + t * (x_droite - x_gauche);
                if let Err(cause) = f.evaluer(x) {
                    rapport.note(x, cause);
                    trouve = true;
                }
            }
            // resté fini malgré le saut : asymptote probable, on le signale
            if !trouve && rapport.zones_suspectes.len() < ZONES_STOCKEES_MAX {
                rapport.zones_suspectes.push((x_gauche, x_droite));
            }
        }
    }

    // 4) Points spéciaux ± tolérance (ex: log(x-2) explose pile en x = 2)
    for p in points_speciaux(a, b) {
        sonde(f, p, &mut rapport);
        if p > a + TOLERANCE_VOISINAGE {
            sonde(f, p - TOLERANCE_VOISINAGE, &mut rapport);
        }
        if p < b - TOLERANCE_VOISINAGE {
            sonde(f, p + TOLERANCE_VOISINAGE, &mut rapport);
        }
    }

    rapport
}

fn sonde(f: &Fonction, x: f64, rapport: &mut RapportDomaine) {
    if let Err(cause) = f.evaluer(x) {
        rapport.note(x, cause);
    }
}

/// Fusionne les runs d'échantillons invalides (longueur >= 2) en zones.
/// Les invalides isolés restent de simples points du rapport.
fn fusionne_zones_invalides(
    valeurs: &[Option<f64>],
    a: f64,
    pas: f64,
    rapport: &mut RapportDomaine,
) {
    let mut debut: Option<usize> = None;

    for i in 0..=valeurs.len() {
        let invalide = i < valeurs.len() && valeurs[i].is_none();
        match (debut, invalide) {
            (None, true) => debut = Some(i),
            (Some(d), false) => {
                if i - d >= 2 && rapport.zones_invalides.len() < ZONES_STOCKEES_MAX {
                    rapport
                        .zones_invalides
                        .push((a + d as f64 * pas, a + (i - 1) as f64 * pas));
                }
                debut = None;
            }
            _ => {}
        }
    }
}

/// Entiers, fractions j/i (i <= 20, donc [0, 1)), π, e, √2, √3 du segment.
fn points_speciaux(a: f64, b: f64) -> Vec<f64> {
    use std::f64::consts;

    let mut pts: Vec<f64> = Vec::new();

    // entiers (garde-fou sur les segments géants : la grille uniforme suffit)
    if b - a <= ENTIERS_MAX {
        let lo = a.ceil() as i64;
        let hi = b.floor() as i64;
        for k in lo..=hi {
            let p = k as f64;
            if p >= a && p <= b {
                pts.push(p);
            }
        }
    }

    // fractions communes j/i
    for i in 1..=DENOMINATEUR_MAX {
        for j in 0..i {
            let p = j as f64 / i as f64;
            if p >= a && p <= b {
                pts.push(p);
            }
        }
    }

    // constantes remarquables
    for v in [consts::PI, consts::E, consts::SQRT_2, 3.0_f64.sqrt()] {
        if v >= a && v <= b {
            pts.push(v);
        }
    }

    // dédoublonnage (1/2 sort aussi en 2/4, 3/6, ...)
    pts.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup();
    pts
}
