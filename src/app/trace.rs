// src/app/trace.rs
//
// Tracé : courbe de f + tranches de Riemann, avec balayage animé.
//
// Peint à la main (painter egui + RectTransform), pas de crate de plot :
// les tranches ne sont pas des séries de points mais des polygones qui
// suivent le profil de la variante (rectangle ou trapèze).
//
// Animation : durée totale ~5 s quel que soit n, donc chaque tranche reste
// visible 5/(n+1) s. Le temps vient de ui.input(|i| i.time) et on demande
// un repaint tant que le balayage n'est pas fini.

use eframe::egui::{self, emath::RectTransform, pos2, vec2, Align2, Color32, FontId, Pos2, Rect,
    Sense, Shape, Stroke};

use crate::noyau::format::format_valeur;
use crate::noyau::{BilanIntegration, ProfilTranche};

/// Échantillons de la courbe (assez dense pour les oscillantes raisonnables).
pub const POINTS_COURBE: usize = 1000;

/// Au-delà, les polygones coûtent plus cher qu'ils n'apprennent : on trace
/// la courbe seule et on le dit.
pub const TRANCHES_DESSIN_MAX: usize = 4000;

/// Durée du balayage complet, en secondes.
pub const DUREE_ANIMATION: f64 = 5.0;

const HAUTEUR_TRACE: f32 = 320.0;

const COULEUR_COURBE: Color32 = Color32::from_rgb(60, 120, 220);
const COULEUR_REMPLISSAGE: Color32 = Color32::from_rgba_premultiplied(55, 15, 15, 60);
const COULEUR_BORD: Color32 = Color32::from_rgb(200, 40, 40);

/// Peint le bilan courant. `animation` porte l'instant de départ du balayage
/// (temps egui) et repasse à None quand toutes les tranches sont posées.
pub fn ui_trace(ui: &mut egui::Ui, bilan: &BilanIntegration, animation: &mut Option<f64>) {
    let n = bilan.tranches.len();

    // au-delà du plafond de dessin, un balayage ne montrerait rien
    if n > TRANCHES_DESSIN_MAX {
        *animation = None;
    }

    // nombre de tranches déjà posées par le balayage
    let visibles = match *animation {
        None => n,
        Some(depart) => {
            let ecoule = ui.input(|i| i.time) - depart;
            let vitesse = DUREE_ANIMATION / (n as f64 + 1.0);
            let v = (1.0 + ecoule / vitesse).floor().max(1.0) as usize;
            if v >= n {
                *animation = None;
                n
            } else {
                ui.ctx().request_repaint();
                v
            }
        }
    };

    let desired = vec2(ui.available_width(), HAUTEUR_TRACE);
    let (reponse, painter) = ui.allocate_painter(desired, Sense::hover());
    let cadre = reponse.rect;
    painter.rect_filled(cadre, 0.0, ui.visuals().extreme_bg_color);

    let (a, b) = (bilan.intervalle.a(), bilan.intervalle.b());

    // Échantillonnage de la courbe. Les points invalides (pôles, log hors
    // domaine) deviennent des trous : la courbe sera peinte par morceaux.
    let pas = (b - a) / (POINTS_COURBE - 1) as f64;
    let mut courbe: Vec<(f64, Option<f64>)> = Vec::with_capacity(POINTS_COURBE);
    for i in 0..POINTS_COURBE {
        let x = if i + 1 == POINTS_COURBE { b } else { a + i as f64 * pas };
        courbe.push((x, bilan.fonction.evaluer(x).ok()));
    }

    // Bornes verticales : la courbe + les hauteurs des tranches (un milieu
    // peut dépasser l'échantillonnage), axe des x toujours inclus.
    let mut y_min = 0.0f64;
    let mut y_max = 0.0f64;
    let mut vus = 0usize;
    for (_, y) in &courbe {
        if let Some(v) = y {
            y_min = y_min.min(*v);
            y_max = y_max.max(*v);
            vus += 1;
        }
    }
    if n <= TRANCHES_DESSIN_MAX {
        for t in &bilan.tranches {
            match t.profil {
                ProfilTranche::Rectangle { hauteur, .. } => {
                    y_min = y_min.min(hauteur);
                    y_max = y_max.max(hauteur);
                }
                ProfilTranche::Trapeze { y_gauche, y_droite } => {
                    y_min = y_min.min(y_gauche).min(y_droite);
                    y_max = y_max.max(y_gauche).max(y_droite);
                }
            }
        }
    }

    if vus == 0 {
        painter.text(
            cadre.center(),
            Align2::CENTER_CENTER,
            "courbe non traçable sur ce segment",
            FontId::proportional(14.0),
            ui.visuals().warn_fg_color,
        );
        return;
    }

    // marge haute de 10 % (et un epsilon si la courbe est plate en zéro)
    let etendue = y_max - y_min;
    if etendue <= f64::EPSILON {
        y_max += 1.0;
    } else {
        y_max += 0.1 * etendue;
    }

    let monde = Rect::from_x_y_ranges(a as f32..=b as f32, y_max as f32..=y_min as f32);
    let vers_ecran = RectTransform::from_to(monde, cadre);
    let projette = |x: f64, y: f64| -> Pos2 { vers_ecran * pos2(x as f32, y as f32) };

    // axes
    let gris = ui.visuals().weak_text_color();
    painter.line_segment([projette(a, 0.0), projette(b, 0.0)], Stroke::new(1.0, gris));
    if a <= 0.0 && 0.0 <= b {
        painter.line_segment(
            [projette(0.0, y_min), projette(0.0, y_max)],
            Stroke::new(1.0, gris),
        );
    }

    // tranches (posées avant la courbe, pour que f reste lisible par-dessus)
    if n <= TRANCHES_DESSIN_MAX {
        let bord = Stroke::new(1.0, COULEUR_BORD);
        for t in &bilan.tranches[..visibles] {
            match t.profil {
                ProfilTranche::Rectangle { hauteur, .. } => {
                    let coins = vec![
                        projette(t.x_gauche, 0.0),
                        projette(t.x_droite, 0.0),
                        projette(t.x_droite, hauteur),
                        projette(t.x_gauche, hauteur),
                    ];
                    painter.add(Shape::convex_polygon(coins.clone(), COULEUR_REMPLISSAGE, Stroke::NONE));
                    painter.add(Shape::closed_line(coins, bord));
                }
                ProfilTranche::Trapeze { y_gauche, y_droite } => {
                    if y_gauche * y_droite < 0.0 {
                        // le bord haut traverse l'axe : deux triangles,
                        // coupés là où la corde s'annule
                        let x0 = t.x_gauche
                            + y_gauche * (t.x_droite - t.x_gauche) / (y_gauche - y_droite);
                        let t1 = vec![
                            projette(t.x_gauche, 0.0),
                            projette(x0, 0.0),
                            projette(t.x_gauche, y_gauche),
                        ];
                        let t2 = vec![
                            projette(x0, 0.0),
                            projette(t.x_droite, 0.0),
                            projette(t.x_droite, y_droite),
                        ];
                        painter.add(Shape::convex_polygon(t1.clone(), COULEUR_REMPLISSAGE, Stroke::NONE));
                        painter.add(Shape::convex_polygon(t2.clone(), COULEUR_REMPLISSAGE, Stroke::NONE));
                        painter.add(Shape::closed_line(t1, bord));
                        painter.add(Shape::closed_line(t2, bord));
                    } else {
                        let coins = vec![
                            projette(t.x_gauche, 0.0),
                            projette(t.x_droite, 0.0),
                            projette(t.x_droite, y_droite),
                            projette(t.x_gauche, y_gauche),
                        ];
                        painter.add(Shape::convex_polygon(coins.clone(), COULEUR_REMPLISSAGE, Stroke::NONE));
                        painter.add(Shape::closed_line(coins, bord));
                    }
                }
            }
        }
    }

    // courbe par morceaux (coupée aux trous du domaine)
    let trait_courbe = Stroke::new(2.0, COULEUR_COURBE);
    let mut morceau: Vec<Pos2> = Vec::new();
    for (x, y) in &courbe {
        match y {
            Some(v) => morceau.push(projette(*x, *v)),
            None => {
                if morceau.len() >= 2 {
                    painter.add(Shape::line(std::mem::take(&mut morceau), trait_courbe));
                } else {
                    morceau.clear();
                }
            }
        }
    }
    if morceau.len() >= 2 {
        painter.add(Shape::line(morceau, trait_courbe));
    }

    // étiquette : somme partielle pendant le balayage, f sinon
    let texte = if visibles < n {
        let partielle = bilan.tranches[visibles - 1].somme_partielle * bilan.intervalle.signe();
        format!(
            "Approximation partielle ({visibles}/{n}) : {}",
            format_valeur(partielle)
        )
    } else if n > TRANCHES_DESSIN_MAX {
        format!(
            "{} ({n} tranches, tracé des tranches coupé au-delà de {TRANCHES_DESSIN_MAX})",
            bilan.fonction.etiquette()
        )
    } else {
        bilan.fonction.etiquette()
    };
    painter.text(
        cadre.left_top() + vec2(8.0, 6.0),
        Align2::LEFT_TOP,
        texte,
        FontId::monospace(13.0),
        ui.visuals().strong_text_color(),
    );
}
