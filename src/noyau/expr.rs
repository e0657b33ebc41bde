// src/noyau/expr.rs
//
// AST réel (f64).
// - Nombre : littéral décimal
// - Pi, E  : constantes
// - Var    : la variable d'intégration (une seule par fonction)
//
// IMPORTANT (SAFE):
// - evaluer() ne panique jamais : tout point hors domaine devient ErreurDomaine.
// - Les formes inf/NaN intermédiaires sont tolérées ici et tranchées à la
//   racine par Fonction::evaluer (un seul point de contrôle).

use std::fmt;

use super::erreurs::ErreurDomaine;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(f64),
    Pi,
    E,

    Var,

    Sqrt(Box<Expr>),
    Abs(Box<Expr>),
    Exp(Box<Expr>),
    Ln(Box<Expr>),
    Log10(Box<Expr>),

    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Évalue l'arbre en x.
    ///
    /// Erreurs locales (point hors domaine) :
    /// - division par un dénominateur nul
    /// - √ d'un négatif
    /// - ln / log10 d'un non-positif
    /// - 0^négatif et base négative avec exposant non entier
    pub fn evaluer(&self, x: f64) -> Result<f64, ErreurDomaine> {
        use Expr::*;

        let v = match self {
            Nombre(c) => *c,
            Pi => std::f64::consts::PI,
            E => std::f64::consts::E,
            Var => x,

            Sqrt(a) => {
                let v = a.evaluer(x)?;
                if v < 0.0 {
                    return Err(ErreurDomaine::RacineDeNegatif);
                }
                v.sqrt()
            }
            Abs(a) => a.evaluer(x)?.abs(),
            Exp(a) => a.evaluer(x)?.exp(),
            Ln(a) => {
                let v = a.evaluer(x)?;
                if v <= 0.0 {
                    return Err(ErreurDomaine::LogDeNonPositif);
                }
                v.ln()
            }
            Log10(a) => {
                let v = a.evaluer(x)?;
                if v <= 0.0 {
                    return Err(ErreurDomaine::LogDeNonPositif);
                }
                v.log10()
            }

            Sin(a) => a.evaluer(x)?.sin(),
            Cos(a) => a.evaluer(x)?.cos(),
            Tan(a) => a.evaluer(x)?.tan(),

            Add(a, b) => a.evaluer(x)? + b.evaluer(x)?,
            Sub(a, b) => a.evaluer(x)? - b.evaluer(x)?,
            Mul(a, b) => a.evaluer(x)? * b.evaluer(x)?,
            Div(a, b) => {
                let d = b.evaluer(x)?;
                if d == 0.0 {
                    return Err(ErreurDomaine::DivisionParZero);
                }
                a.evaluer(x)? / d
            }
            Pow(a, b) => {
                let base = a.evaluer(x)?;
                let expo = b.evaluer(x)?;
                if base == 0.0 && expo < 0.0 {
                    return Err(ErreurDomaine::DivisionParZero);
                }
                let v = base.powf(expo);
                // powf(négatif, non entier) rend NaN : c'est un trou de domaine,
                // pas une forme indéterminée.
                if v.is_nan() && base.is_finite() && expo.is_finite() {
                    return Err(ErreurDomaine::PuissanceIndefinie);
                }
                v
            }
        };

        Ok(v)
    }

    /// Profondeur de l'arbre, SANS récursion (pile explicite).
    /// Sert de garde-fou à la compilation : borne la récursion d'evaluer().
    pub fn profondeur(&self) -> usize {
        let mut pile: Vec<(&Expr, usize)> = vec![(self, 1)];
        let mut max = 1usize;

        while let Some((e, p)) = pile.pop() {
            if p > max {
                max = p;
            }
            use Expr::*;
            match e {
                Nombre(_) | Pi | E | Var => {}
                Sqrt(a) | Abs(a) | Exp(a) | Ln(a) | Log10(a) | Sin(a) | Cos(a) | Tan(a) => {
                    pile.push((a, p + 1));
                }
                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => {
                    pile.push((a, p + 1));
                    pile.push((b, p + 1));
                }
            }
        }

        max
    }

    /// Vrai si l'arbre contient la variable (même pile explicite).
    pub fn contient_var(&self) -> bool {
        let mut pile: Vec<&Expr> = vec![self];

        while let Some(e) = pile.pop() {
            use Expr::*;
            match e {
                Var => return true,
                Nombre(_) | Pi | E => {}
                Sqrt(a) | Abs(a) | Exp(a) | Ln(a) | Log10(a) | Sin(a) | Cos(a) | Tan(a) => {
                    pile.push(a);
                }
                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => {
                    pile.push(a);
                    pile.push(b);
                }
            }
        }

        false
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Nombre(v) => write!(f, "{v}"),
            Pi => write!(f, "π"),
            E => write!(f, "e"),
            Var => write!(f, "x"),
            Sqrt(a) => write!(f, "√({a})"),
            Abs(a) => write!(f, "abs({a})"),
            Exp(a) => write!(f, "exp({a})"),
            Ln(a) => write!(f, "ln({a})"),
            Log10(a) => write!(f, "log10({a})"),
            Sin(a) => write!(f, "sin({a})"),
            Cos(a) => write!(f, "cos({a})"),
            Tan(a) => write!(f, "tan({a})"),
            Add(a, b) => write!(f, "({a}+{b})"),
            Sub(a, b) => write!(f, "({a}-{b})"),
            Mul(a, b) => write!(f, "({a}*{b})"),
            Div(a, b) => write!(f, "({a}/{b})"),
            Pow(a, b) => write!(f, "({a})^({b})"),
        }
    }
}
