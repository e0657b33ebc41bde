// src/noyau/riemann.rs
//
// Sommes de Riemann sur [a, b] découpé en n pas égaux.
// Chaque pas produit une Tranche (profil à dessiner + aire + somme partielle):
// c'est la matière première de l'animation.
//
// Orientation : tout se calcule ici sur l'intervalle ordonné (a < b);
// l'inversion éventuelle des bornes est appliquée par le pipeline.

use super::erreurs::ErreurIntegrale;
use super::fonction::Fonction;
use super::integrale::Intervalle;

/// Garde-fou anti-gel : au-delà, la boucle (et le Vec de tranches) coûte
/// plus que ce que l'outil apporte.
pub const SUBDIVISIONS_MAX: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variante {
    Gauche,
    Droite,
    Milieu,
    Trapeze,
}

impl Variante {
    pub const TOUTES: [Variante; 4] = [
        Variante::Gauche,
        Variante::Droite,
        Variante::Milieu,
        Variante::Trapeze,
    ];

    pub fn nom(&self) -> &'static str {
        match self {
            Variante::Gauche => "point gauche",
            Variante::Droite => "point droit",
            Variante::Milieu => "point milieu",
            Variante::Trapeze => "trapèze",
        }
    }
}

/// Ce qu'il faut dessiner au-dessus d'un pas [x_gauche, x_droite].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProfilTranche {
    /// Rectangle de hauteur f(x_eval), x_eval ∈ {gauche, droite, milieu}.
    Rectangle { x_eval: f64, hauteur: f64 },
    /// Trapèze tendu entre f(x_gauche) et f(x_droite).
    Trapeze { y_gauche: f64, y_droite: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tranche {
    pub x_gauche: f64,
    pub x_droite: f64,
    pub profil: ProfilTranche,
    /// Contribution signée de ce pas.
    pub aire: f64,
    /// Somme des contributions jusqu'à ce pas inclus.
    pub somme_partielle: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SommeRiemann {
    pub valeur: f64,
    pub variante: Variante,
    pub tranches: Vec<Tranche>,
}

/// Somme de Riemann à pas constant h = (b-a)/n.
///
/// - gauche  : f(a + i·h)
/// - droite  : f(a + (i+1)·h)
/// - milieu  : f(a + (i+0,5)·h)
/// - trapèze : h·(f(xᵢ) + f(xᵢ₊₁))/2
///
/// Erreurs : `Subdivisions` si n = 0 ou n > SUBDIVISIONS_MAX,
/// `Domaine` si f n'est pas définie en un point d'évaluation.
pub fn somme_riemann(
    f: &Fonction,
    intervalle: &Intervalle,
    n: u32,
    variante: Variante,
) -> Result<SommeRiemann, ErreurIntegrale> {
    if n == 0 || n > SUBDIVISIONS_MAX {
        return Err(ErreurIntegrale::Subdivisions(i64::from(n)));
    }

    let a = intervalle.a();
    let b = intervalle.b();
    let pas = intervalle.largeur() / f64::from(n);

    let eval = |x: f64| -> Result<f64, ErreurIntegrale> {
        f.evaluer(x).map_err(|cause| ErreurIntegrale::domaine(x, cause))
    };

    let mut somme = 0.0;
    let mut tranches = Vec::with_capacity(n as usize);

    for i in 0..n {
        let x_gauche = a + f64::from(i) * pas;
        // dernier point collé à b (dérive flottante)
        let x_droite = if i + 1 == n {
            b
        } else {
            a + f64::from(i + 1) * pas
        };

        let (profil, aire) = match variante {
            Variante::Gauche => {
                let y = eval(x_gauche)?;
                (
                    ProfilTranche::Rectangle {
                        x_eval: x_gauche,
                        hauteur: y,
                    },
                    y * pas,
                )
            }
            Variante::Droite => {
                let y = eval(x_droite)?;
                (
                    ProfilTranche::Rectangle {
                        x_eval: x_droite,
                        hauteur: y,
                    },
                    y * pas,
                )
            }
            Variante::Milieu => {
                let x_milieu = a + (f64::from(i) + 0.5) * pas;
                let y = eval(x_milieu)?;
                (
                    ProfilTranche::Rectangle {
                        x_eval: x_milieu,
                        hauteur: y,
                    },
                    y * pas,
                )
            }
            Variante::Trapeze => {
                let y_gauche = eval(x_gauche)?;
                let y_droite = eval(x_droite)?;
                (
                    ProfilTranche::Trapeze { y_gauche, y_droite },
                    (y_gauche + y_droite) / 2.0 * pas,
                )
            }
        };

        somme += aire;
        tranches.push(Tranche {
            x_gauche,
            x_droite,
            profil,
            aire,
            somme_partielle: somme,
        });
    }

    Ok(SommeRiemann {
        valeur: somme,
        variante,
        tranches,
    })
}
