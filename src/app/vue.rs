// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppIntegrales (etat.rs) pour natif + wasm
// - Clavier : Enter calcule, Backspace efface (quand le champ est focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Tout le calcul passe par construire_demande() + noyau::integrer()
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)
// - Enter suffit (clavier PC + “Enter” virtuel mobile selon navigateur)

use eframe::egui;

use super::etat::{AppIntegrales, ChoixMethode};
use super::trace;
use crate::noyau::format::{
    format_erreur_estimee, format_pourcentage, format_segment, format_valeur,
};
use crate::noyau::riemann::SUBDIVISIONS_MAX;
use crate::noyau::{
    valider_subdivisions, DemandeIntegration, ErreurIntegrale, Fonction, Intervalle, Methode,
    RapportDomaine, Variante,
};

impl AppIntegrales {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Intégrales - Sommes de Riemann");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                self.ui_trace_section(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Fonction :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: x^2, sin(x), exp(-x)*x, 1/x")
                .id_source("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton (pavé / fonctions / DEL / C / etc.), on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Enter calcule (seulement si le champ est focus) ---
        // On évite les déclenchements “globaux” quand l’utilisateur clique ailleurs.
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.calculer();
            self.focus_entree = true;
        }

        // --- Clavier : Backspace (seulement si le champ est focus) ---
        // TextEdit gère déjà Backspace “normal”, mais notre backspace_entree()
        // est utile pour effacer des tokens complets ("sin(", "pi", etc.).
        let backspace = ui.input(|i| i.key_pressed(egui::Key::Backspace));
        if resp.has_focus() && backspace {
            self.backspace_entree();
            self.focus_entree = true;
        }

        ui.add_space(6.0);

        // Variable + segment d'intégration
        ui.horizontal(|ui| {
            ui.label("Variable :");
            ui.add(
                egui::TextEdit::singleline(&mut self.variable)
                    .desired_width(48.0)
                    .id_source("variable_edit"),
            );

            ui.separator();

            ui.label("Segment : de");
            ui.add(
                egui::TextEdit::singleline(&mut self.borne_a)
                    .desired_width(90.0)
                    .hint_text("0")
                    .id_source("borne_a_edit"),
            );
            ui.label("à");
            ui.add(
                egui::TextEdit::singleline(&mut self.borne_b)
                    .desired_width(90.0)
                    .hint_text("pi")
                    .id_source("borne_b_edit"),
            );
        });

        // Méthode (et variante + subdivisions quand Riemann)
        ui.horizontal(|ui| {
            ui.label("Méthode :");
            ui.radio_value(
                &mut self.choix,
                ChoixMethode::Riemann,
                "Sommes de Riemann",
            );
            ui.radio_value(&mut self.choix, ChoixMethode::Exacte, "Exacte (quadrature)");
        });

        if self.choix == ChoixMethode::Riemann {
            ui.horizontal_wrapped(|ui| {
                ui.label("Variante :");
                for v in Variante::TOUTES {
                    ui.radio_value(&mut self.variante, v, v.nom());
                }

                ui.separator();

                ui.label("Tranches :");
                let mut n = self.subdivisions;
                let resp = ui.add(
                    egui::DragValue::new(&mut n)
                        .speed(1)
                        .range(1..=SUBDIVISIONS_MAX),
                );
                if resp.changed() {
                    self.set_subdivisions(n);
                }
            });
        }

        ui.add_space(8.0);

        // Actions
        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultats + erreur + tracé",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            let calc = ui.add_sized([96.0, 30.0], egui::Button::new("Calculer"));
            if calc.clicked() {
                self.calculer();
                self.focus_entree = true;
            }

            let a_tranches = self
                .bilan
                .as_ref()
                .map(|b| !b.tranches.is_empty())
                .unwrap_or(false);
            let anim = ui
                .add_enabled(
                    a_tranches,
                    egui::Button::new("Animer").min_size(egui::vec2(96.0, 30.0)),
                )
                .on_hover_text("Rejoue la construction des tranches (balayage de 5 s)");
            if anim.clicked() {
                let maintenant = ui.input(|i| i.time);
                self.demarrer_animation(maintenant);
            }
        });

        ui.add_space(8.0);

        // Touches rapides
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "pi", "pi", InsertKind::Word);
            self.bouton_insert(ui, "sqrt", "sqrt(", InsertKind::Func);
            self.bouton_insert(ui, "sin", "sin(", InsertKind::Func);
            self.bouton_insert(ui, "cos", "cos(", InsertKind::Func);
            self.bouton_insert(ui, "tan", "tan(", InsertKind::Func);
            self.bouton_insert(ui, "exp", "exp(", InsertKind::Func);
            self.bouton_insert(ui, "ln", "ln(", InsertKind::Func);
            self.bouton_insert(ui, "abs", "abs(", InsertKind::Func);

            ui.separator();

            // La variable du moment (utile sur mobile)
            let var = self.variable.trim().to_string();
            if !var.is_empty() {
                self.bouton_insert(ui, &var, &var, InsertKind::Word);
            }
        });

        ui.add_space(8.0);

        // Pavé numérique
        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_integrales")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7", InsertKind::Digit);
                self.bouton_insert(ui, "8", "8", InsertKind::Digit);
                self.bouton_insert(ui, "9", "9", InsertKind::Digit);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", "4", InsertKind::Digit);
                self.bouton_insert(ui, "5", "5", InsertKind::Digit);
                self.bouton_insert(ui, "6", "6", InsertKind::Digit);
                self.bouton_insert(ui, "/", "/", InsertKind::Op);
                ui.end_row();

                self.bouton_insert(ui, "1", "1", InsertKind::Digit);
                self.bouton_insert(ui, "2", "2", InsertKind::Digit);
                self.bouton_insert(ui, "3", "3", InsertKind::Digit);
                self.bouton_insert(ui, ".", ".", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup les motifs utiles ("sin(", "pi", etc.).
    fn backspace_entree(&mut self) {
        if self.entree.is_empty() {
            return;
        }

        // Retire espaces finaux
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        // Retire tokens connus
        for pat in [
            "sqrt(", "sin(", "cos(", "tan(", "exp(", "ln(", "log10(", "log(", "abs(", "pi",
        ] {
            if self.entree.ends_with(pat) {
                for _ in 0..pat.chars().count() {
                    self.entree.pop();
                }
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                return;
            }
        }

        // Sinon : un caractère
        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        let Some(bilan) = &self.bilan else {
            ui.label("Résultat :");
            ui.monospace("aucun calcul pour l’instant");
            return;
        };

        ui.label("Résultat :");
        Self::champ_monospace(ui, "resultat_out", &format_valeur(bilan.valeur), 1);

        if let Some(e) = bilan.erreur_estimee {
            ui.add_space(6.0);
            ui.label("Erreur estimée :");
            Self::champ_monospace(ui, "estimee_out", &format_erreur_estimee(e), 1);
        }

        if let Some(cmp) = &bilan.comparaison {
            ui.add_space(6.0);
            ui.label("Référence exacte :");
            Self::champ_monospace(ui, "reference_out", &format_valeur(cmp.reference), 1);

            ui.add_space(6.0);
            ui.label("Erreur absolue :");
            Self::champ_monospace(ui, "abs_out", &format_valeur(cmp.absolue), 1);

            ui.add_space(6.0);
            ui.label("Erreur relative :");
            let relative = match cmp.relative {
                Some(r) => format_pourcentage(r),
                None => "sans objet (référence nulle)".to_string(),
            };
            Self::champ_monospace(ui, "rel_out", &relative, 1);
        }

        for note in &bilan.notes {
            ui.add_space(4.0);
            ui.colored_label(ui.visuals().warn_fg_color, note);
        }
    }

    fn ui_trace_section(&mut self, ui: &mut egui::Ui) {
        let Some(bilan) = &self.bilan else {
            return;
        };
        trace::ui_trace(ui, bilan, &mut self.animation);
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        let Some(bilan) = &self.bilan else {
            return;
        };

        egui::CollapsingHeader::new("Démarche")
            .default_open(true)
            .show(ui, |ui| {
                Self::champ_demarche(
                    ui,
                    "Fonction",
                    "demarche_fonction",
                    &bilan.fonction.etiquette(),
                );
                Self::champ_demarche(
                    ui,
                    "Segment",
                    "demarche_segment",
                    &format_segment(
                        bilan.intervalle.a(),
                        bilan.intervalle.b(),
                        bilan.intervalle.est_inverse(),
                    ),
                );
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", bilan.fonction.jetons());
                Self::champ_demarche(ui, "RPN", "demarche_rpn", bilan.fonction.rpn());
                Self::champ_demarche(ui, "Méthode", "demarche_methode", &bilan.methode.decrire());
                Self::champ_demarche(ui, "Calcul", "demarche_calcul", &bilan.note_calcul);
                Self::champ_demarche(
                    ui,
                    "Domaine",
                    "demarche_domaine",
                    &resume_rapport(&bilan.rapport),
                );
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        // On garde un cadre visuel via Frame + Label monospace.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return;
        }

        match kind {
            InsertKind::CloseParen => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func => {
                if !self.entree.is_empty() {
                    let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c.is_ascii_alphabetic() || c == ')' {
                            self.entree.push(' ');
                        }
                    }
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => {
                // chiffres: pas d’espaces auto
                self.entree.push_str(to_insert);
            }
            InsertKind::Word => {
                // mots: espace si juste avant c’est un chiffre ou ')'
                if !self.entree.is_empty() && !self.entree.ends_with(char::is_whitespace) {
                    let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c == ')' {
                            self.entree.push(' ');
                        }
                    }
                }
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /// Assemble la demande à partir des saisies (fonction, bornes, méthode).
    fn construire_demande(&self) -> Result<DemandeIntegration, ErreurIntegrale> {
        let fonction = Fonction::compiler(&self.entree, &self.variable)?;
        let de = lire_borne(&self.borne_a, "borne de départ", &self.variable)?;
        let vers = lire_borne(&self.borne_b, "borne d'arrivée", &self.variable)?;
        let intervalle = Intervalle::nouveau(de, vers)?;

        let methode = match self.choix {
            ChoixMethode::Exacte => Methode::Exacte,
            ChoixMethode::Riemann => Methode::Riemann {
                variante: self.variante,
                // le DragValue borne la saisie; la porte revalide un état
                // posé sans passer par set_subdivisions
                subdivisions: valider_subdivisions(i64::from(self.subdivisions))?,
            },
        };

        Ok(DemandeIntegration {
            fonction,
            intervalle,
            methode,
        })
    }

    /// Calcule via le noyau, puis dépose bilan ou erreur dans l’état UI.
    fn calculer(&mut self) {
        match self
            .construire_demande()
            .and_then(|demande| crate::noyau::integrer(&demande))
        {
            Ok(bilan) => self.set_bilan(bilan),
            Err(e) => self.set_erreur(e.to_string()),
        }
        self.focus_entree = true;
    }
}

/// Lit une borne : nombre direct, sinon expression constante ("pi", "2*pi/3",
/// "sqrt(2)"). Une borne qui dépend de la variable est refusée.
fn lire_borne(texte: &str, quoi: &str, variable: &str) -> Result<f64, ErreurIntegrale> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(ErreurIntegrale::Bornes(format!("{quoi} vide")));
    }

    if let Ok(v) = s.parse::<f64>() {
        return Ok(v);
    }

    let c = Fonction::compiler(s, variable)
        .map_err(|_| ErreurIntegrale::Bornes(format!("{quoi} illisible: '{s}'")))?;
    if !c.est_constante() {
        return Err(ErreurIntegrale::Bornes(format!(
            "{quoi} '{s}': une borne ne peut pas dépendre de {variable}"
        )));
    }
    c.evaluer(0.0)
        .map_err(|e| ErreurIntegrale::Bornes(format!("{quoi} '{s}': {e}")))
}

/// Une ligne pour le panneau démarche : ce que le balayage a vu.
fn resume_rapport(rapport: &RapportDomaine) -> String {
    if rapport.est_propre() && rapport.zones_suspectes.is_empty() {
        return format!("rien à signaler ({} échantillons)", rapport.echantillons);
    }

    let mut parts = vec![format!("{} échantillons", rapport.echantillons)];
    if rapport.invalides_total > 0 {
        parts.push(format!("{} point(s) invalide(s)", rapport.invalides_total));
    }
    if !rapport.zones_invalides.is_empty() {
        parts.push(format!(
            "{} zone(s) hors domaine",
            rapport.zones_invalides.len()
        ));
    }
    if !rapport.zones_suspectes.is_empty() {
        parts.push(format!(
            "{} zone(s) suspecte(s)",
            rapport.zones_suspectes.len()
        ));
    }
    parts.join(", ")
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    OpenParen,
    CloseParen,
}
