//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : vérifier les propriétés de cours sans faire chauffer la machine.
//! - budget temps global sur les boucles
//! - tolérances flottantes explicites (l'ordre de sommation diffère entre
//!   trapèze par pas et moyenne des sommes gauche/droite)
//!
//! Notes importantes (aligné avec l’état actuel du noyau) :
//! - La grille du balayage ne tombe pas forcément sur un pôle (style linspace);
//!   ce sont les points “ronds” (entiers, fractions) qui garantissent le
//!   signalement de 1/x en 0 ou de 1/(x-1/2) en 1/2.
//! - tan garde des valeurs finies au voisinage de π/2 en f64 : l'asymptote
//!   sort en zone suspecte (saut brutal), pas en point invalide.

use std::time::{Duration, Instant};

use super::domaine::scanner_domaine;
use super::erreurs::{ErreurDomaine, ErreurIntegrale};
use super::format::format_pourcentage;
use super::riemann::somme_riemann;
use super::{
    integrer, valider_subdivisions, DemandeIntegration, Fonction, Intervalle, Methode, Variante,
};

fn fx(texte: &str) -> Fonction {
    Fonction::compiler(texte, "x").unwrap_or_else(|e| panic!("expr={texte:?} err={e}"))
}

fn seg(a: f64, b: f64) -> Intervalle {
    Intervalle::nouveau(a, b).unwrap_or_else(|e| panic!("[{a}, {b}] err={e}"))
}

fn somme(texte: &str, a: f64, b: f64, n: u32, variante: Variante) -> f64 {
    somme_riemann(&fx(texte), &seg(a, b), n, variante)
        .unwrap_or_else(|e| panic!("somme {texte:?} err={e}"))
        .valeur
}

fn refus_analyse(texte: &str) {
    match Fonction::compiler(texte, "x") {
        Err(ErreurIntegrale::Analyse(_)) => {}
        autre => panic!("expr={texte:?} devrait être refusée à l'analyse, obtenu {autre:?}"),
    }
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Analyse (jetons -> RPN -> Expr) ------------------------ */

#[test]
fn sci_formes_equivalentes() {
    // ** est un alias de ^, √ un alias de sqrt, log un alias de ln
    let paires = [
        ("x**2", "x^2"),
        ("√(x+1)", "sqrt(x+1)"),
        ("log(x+1)", "ln(x+1)"),
    ];
    for (gauche, droite) in paires {
        let fg = fx(gauche);
        let fd = fx(droite);
        for x in [0.0, 0.5, 1.0, 2.25] {
            let vg = fg.evaluer(x).unwrap();
            let vd = fd.evaluer(x).unwrap();
            assert_eq!(vg, vd, "{gauche} vs {droite} en x={x}");
        }
    }
}

#[test]
fn sci_litteraux_et_constantes() {
    assert_eq!(fx(".5").evaluer(0.0).unwrap(), 0.5);
    assert_eq!(fx("1e-3").evaluer(0.0).unwrap(), 1e-3);
    assert_eq!(fx("2.5e2").evaluer(0.0).unwrap(), 250.0);
    assert_eq!(fx("pi").evaluer(0.0).unwrap(), std::f64::consts::PI);
    assert_eq!(fx("π").evaluer(0.0).unwrap(), std::f64::consts::PI);
    assert_eq!(fx("e").evaluer(0.0).unwrap(), std::f64::consts::E);
    // moins unaire
    assert_eq!(fx("-x^2").evaluer(2.0).unwrap(), -4.0);
}

#[test]
fn sci_refus_a_l_analyse() {
    refus_analyse(""); // entrée vide
    refus_analyse("2x"); // pas de multiplication implicite
    refus_analyse("y + 1"); // identifiant libre
    refus_analyse("sin()"); // fonction sans argument
    refus_analyse("(x + 1"); // parenthèses non fermées
    refus_analyse("x + * 2"); // opérateurs orphelins

    // variable réservée
    match Fonction::compiler("x", "sin") {
        Err(ErreurIntegrale::Analyse(msg)) => assert!(msg.contains("réservé"), "{msg}"),
        autre => panic!("variable réservée acceptée: {autre:?}"),
    }
}

#[test]
fn sci_trous_de_domaine_types() {
    let cas: [(&str, f64, ErreurDomaine); 6] = [
        ("1/x", 0.0, ErreurDomaine::DivisionParZero),
        ("sqrt(x)", -1.0, ErreurDomaine::RacineDeNegatif),
        ("ln(x)", 0.0, ErreurDomaine::LogDeNonPositif),
        ("log10(x)", -2.0, ErreurDomaine::LogDeNonPositif),
        ("exp(x)", 1000.0, ErreurDomaine::Debordement),
        ("(0-2)^x", 0.5, ErreurDomaine::PuissanceIndefinie),
    ];
    for (texte, x, attendu) in cas {
        let err = fx(texte).evaluer(x).unwrap_err();
        assert_eq!(err, attendu, "expr={texte:?} x={x}");
    }

    // 0^négatif est une division par zéro déguisée
    assert_eq!(
        fx("x^(0-1)").evaluer(0.0).unwrap_err(),
        ErreurDomaine::DivisionParZero
    );
}

/* ------------------------ Sommes de Riemann (propriétés du cours) ------------------------ */

#[test]
fn sci_encadrement_fonction_croissante() {
    // f croissante : somme gauche <= intégrale <= somme droite
    let attendu = std::f64::consts::E - 1.0;
    for n in [4, 16, 64] {
        let gauche = somme("exp(x)", 0.0, 1.0, n, Variante::Gauche);
        let droite = somme("exp(x)", 0.0, 1.0, n, Variante::Droite);
        assert!(gauche < attendu, "n={n} gauche={gauche}");
        assert!(droite > attendu, "n={n} droite={droite}");
    }
}

#[test]
fn sci_trapeze_moyenne_gauche_droite() {
    // identité structurelle, quel que soit f et n
    let fonctions = ["x^2", "sin(x)", "exp(x) + 1/(x+2)"];
    for texte in fonctions {
        for n in [1, 7, 33] {
            let g = somme(texte, -1.0, 2.0, n, Variante::Gauche);
            let d = somme(texte, -1.0, 2.0, n, Variante::Droite);
            let t = somme(texte, -1.0, 2.0, n, Variante::Trapeze);
            let moyenne = (g + d) / 2.0;
            assert!(
                (t - moyenne).abs() <= 1e-12 * t.abs().max(1.0),
                "f={texte:?} n={n} trapèze={t} moyenne={moyenne}"
            );
        }
    }
}

#[test]
fn sci_formules_fermees_petits_n() {
    // f(x) = x sur [0,1] : gauche = (n-1)/2n, droite = (n+1)/2n
    let g = somme("x", 0.0, 1.0, 10, Variante::Gauche);
    let d = somme("x", 0.0, 1.0, 10, Variante::Droite);
    assert!((g - 0.45).abs() < 1e-12);
    assert!((d - 0.55).abs() < 1e-12);

    // sin sur [0, π], trapèze n = 2 : π/4·(0+1) + π/4·(1+0) = π/2
    let t = somme("sin(x)", 0.0, std::f64::consts::PI, 2, Variante::Trapeze);
    assert!((t - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn sci_convergence_erreur_decroissante() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // milieu sur x² [0,3], valeur vraie 9 : l'écart fond en 1/n²
    let mut precedent = f64::INFINITY;
    for n in [10, 100, 1000] {
        let s = somme("x^2", 0.0, 3.0, n, Variante::Milieu);
        let ecart = (s - 9.0).abs();
        assert!(ecart < precedent, "n={n} écart={ecart} précédent={precedent}");
        precedent = ecart;
        budget(t0, max);
    }
    assert!(precedent < 1e-3, "n=1000 devrait approcher 9 à 1e-3 près");
}

/* ------------------------ Balayage du domaine ------------------------ */

#[test]
fn sci_domaine_propre_sur_polynome() {
    let rapport = scanner_domaine(&fx("x^2"), &seg(0.0, 3.0), 1000);
    assert!(rapport.est_propre());
    assert!(rapport.zones_invalides.is_empty());
    assert!(rapport.zones_suspectes.is_empty());
}

#[test]
fn sci_domaine_pole_en_zero() {
    // la grille (style linspace) rate 0, le point “rond” 0 le rattrape
    let rapport = scanner_domaine(&fx("1/x"), &seg(-1.0, 1.0), 1000);
    assert!(!rapport.est_propre());
    assert!(rapport
        .invalides
        .iter()
        .any(|p| p.x == 0.0 && p.cause == ErreurDomaine::DivisionParZero));
}

#[test]
fn sci_domaine_pole_fraction_commune() {
    let rapport = scanner_domaine(&fx("1/(x-1/2)"), &seg(0.0, 1.0), 1000);
    assert!(rapport
        .invalides
        .iter()
        .any(|p| p.x == 0.5 && p.cause == ErreurDomaine::DivisionParZero));
}

#[test]
fn sci_domaine_demi_segment_hors_domaine() {
    // ln(x-2) n'existe que pour x > 2 : zone entière invalide sur [0, 3]
    let rapport = scanner_domaine(&fx("ln(x-2)"), &seg(0.0, 3.0), 1000);
    assert!(!rapport.est_propre());
    assert!(!rapport.zones_invalides.is_empty());
    let (zg, _zd) = rapport.zones_invalides[0];
    assert!(zg <= 0.01, "la zone invalide commence au bord gauche");
}

#[test]
fn sci_domaine_asymptote_reste_finie_mais_suspecte() {
    // tan ne déborde jamais en f64 : le saut autour de π/2 sort en zone suspecte
    let rapport = scanner_domaine(&fx("tan(x)"), &seg(1.0, 2.0), 1000);
    assert!(rapport.est_propre(), "aucun point n'échoue vraiment");
    assert!(!rapport.zones_suspectes.is_empty());
    // les sauts voisins de l'asymptote peuvent sortir avant elle dans l'ordre
    // de la grille; au moins une zone doit encadrer π/2
    assert!(
        rapport
            .zones_suspectes
            .iter()
            .any(|&(zg, zd)| zg < std::f64::consts::FRAC_PI_2 && std::f64::consts::FRAC_PI_2 < zd),
        "zones suspectes: {:?}",
        rapport.zones_suspectes
    );
}

/* ------------------------ Pipeline complet ------------------------ */

#[test]
fn sci_pipeline_comparaison_au_pourcent() {
    // gauche n=100 sur x² [0,3] : somme = 0,03³·Σi² = 8,86545 exactement
    let bilan = integrer(&DemandeIntegration {
        fonction: fx("x^2"),
        intervalle: seg(0.0, 3.0),
        methode: Methode::Riemann {
            variante: Variante::Gauche,
            subdivisions: 100,
        },
    })
    .unwrap();

    assert!((bilan.valeur - 8.86545).abs() < 1e-9);
    let cmp = bilan.comparaison.expect("référence attendue");
    assert!((cmp.absolue - 0.13455).abs() < 1e-8);
    let rel = cmp.relative.expect("référence non nulle");
    assert_eq!(format_pourcentage(rel), "1.4950 %");
}

#[test]
fn sci_pipeline_subdivisions_invalides() {
    assert!(matches!(
        valider_subdivisions(0),
        Err(ErreurIntegrale::Subdivisions(0))
    ));
    assert!(matches!(
        valider_subdivisions(-5),
        Err(ErreurIntegrale::Subdivisions(-5))
    ));
    assert!(valider_subdivisions(1).is_ok());
}

#[test]
fn sci_pipeline_exacte_sur_references() {
    let cas = [
        ("x^2", 0.0, 3.0, 9.0),
        ("sin(x)", 0.0, std::f64::consts::PI, 2.0),
        ("exp(x)", 0.0, 1.0, std::f64::consts::E - 1.0),
    ];
    for (texte, a, b, attendu) in cas {
        let bilan = integrer(&DemandeIntegration {
            fonction: fx(texte),
            intervalle: seg(a, b),
            methode: Methode::Exacte,
        })
        .unwrap();
        assert!(
            (bilan.valeur - attendu).abs() < 1e-9,
            "∫ {texte:?} = {} attendu {attendu}",
            bilan.valeur
        );
    }
}
