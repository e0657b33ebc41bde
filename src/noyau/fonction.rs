//! Noyau — fonction compilée (pipeline réel)
//!
//! tokenize -> RPN -> Expr, UNE seule fois par saisie; ensuite evaluer(x)
//! autant de fois que les intégrateurs le demandent.
//!
//! Remarque : les textes jetons/RPN sont gardés sur la Fonction pour le
//! panneau “démarche” (ils ne coûtent que deux String).

use std::fmt;

use super::erreurs::{ErreurDomaine, ErreurIntegrale};
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, is_fonction_ident, to_rpn};

/// Garde-fou anti-débordement de pile : evaluer() est récursif,
/// donc la profondeur d'arbre est bornée à la compilation.
pub const PROFONDEUR_MAX: usize = 512;

/// Fonction réelle d'une variable, compilée depuis le texte utilisateur.
#[derive(Clone, Debug)]
pub struct Fonction {
    texte: String,
    variable: String,
    ast: Expr,
    jetons_txt: String,
    rpn_txt: String,
}

impl Fonction {
    /// Compile `texte` en fonction de `variable` (défaut habituel: "x").
    ///
    /// Toute erreur d'analyse (caractère inconnu, parenthèses, identifiant
    /// libre, variable réservée, arbre trop profond) sort en `Analyse`.
    pub fn compiler(texte: &str, variable: &str) -> Result<Self, ErreurIntegrale> {
        let s = texte.trim();
        if s.is_empty() {
            return Err(ErreurIntegrale::Analyse("entrée vide".into()));
        }

        let variable = valider_variable(variable)?;

        // 1) Jetons
        let jetons = tokenize(s).map_err(ErreurIntegrale::Analyse)?;
        let jetons_txt = format_tokens(&jetons);

        // 2) RPN
        let rpn = to_rpn(&jetons).map_err(ErreurIntegrale::Analyse)?;
        let rpn_txt = format_tokens(&rpn);

        // 3) AST (Expr), variable liée par nom
        let ast = from_rpn(&rpn, &variable).map_err(ErreurIntegrale::Analyse)?;

        if ast.profondeur() > PROFONDEUR_MAX {
            return Err(ErreurIntegrale::Analyse(format!(
                "expression trop profonde (limite: {PROFONDEUR_MAX})"
            )));
        }

        Ok(Fonction {
            texte: s.to_string(),
            variable,
            ast,
            jetons_txt,
            rpn_txt,
        })
    }

    /// Évalue f au point x.
    ///
    /// Point de contrôle unique pour les non-finis : un inf intermédiaire qui
    /// survit jusqu'ici devient Debordement, un NaN devient Indetermine
    /// (ex: exp(1000) - exp(1000)).
    pub fn evaluer(&self, x: f64) -> Result<f64, ErreurDomaine> {
        let v = self.ast.evaluer(x)?;
        if v.is_nan() {
            return Err(ErreurDomaine::Indetermine);
        }
        if v.is_infinite() {
            return Err(ErreurDomaine::Debordement);
        }
        Ok(v)
    }

    /// Vrai si l'expression ne dépend pas de la variable.
    /// (Les bornes saisies comme "pi" ou "2*pi/3" passent par ici.)
    pub fn est_constante(&self) -> bool {
        !self.ast.contient_var()
    }

    pub fn jetons(&self) -> &str {
        &self.jetons_txt
    }

    pub fn rpn(&self) -> &str {
        &self.rpn_txt
    }

    /// Étiquette d'affichage : "f(x) = x^2 + 1".
    pub fn etiquette(&self) -> String {
        format!("f({}) = {}", self.variable, self.texte)
    }
}

impl fmt::Display for Fonction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.etiquette())
    }
}

/// Valide le nom de variable : forme d'identifiant, pas un mot réservé.
/// Retourne le nom normalisé (minuscules).
fn valider_variable(nom: &str) -> Result<String, ErreurIntegrale> {
    let v = nom.trim().to_lowercase();

    if v.is_empty() {
        return Err(ErreurIntegrale::Analyse("nom de variable vide".into()));
    }

    let mut chars = v.chars();
    let premier = chars.next().unwrap_or('?');
    let forme_ok = (premier.is_ascii_alphabetic() || premier == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !forme_ok {
        return Err(ErreurIntegrale::Analyse(format!(
            "nom de variable invalide: '{v}'"
        )));
    }

    if is_fonction_ident(&v) || v == "pi" || v == "e" {
        return Err(ErreurIntegrale::Analyse(format!(
            "'{v}' est un mot réservé, choisir un autre nom de variable"
        )));
    }

    Ok(v)
}
