//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée à la génération
//! - budget temps global
//! - on accepte les erreurs de domaine (elles sont le sujet même du fuzz)
//! - invariants clés :
//!     * evaluer() ne rend jamais Ok(non-fini)
//!     * un échec de somme est toujours une erreur de point typée
//!     * trapèze == (gauche + droite) / 2 sur toute expression générée

use std::time::{Duration, Instant};

use super::erreurs::ErreurIntegrale;
use super::riemann::somme_riemann;
use super::{Fonction, Intervalle, Variante};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn compile(texte: &str) -> Fonction {
    // le générateur n'émet que des formes syntaxiquement valides
    Fonction::compiler(texte, "x").unwrap_or_else(|e| panic!("expr={texte:?} err={e}"))
}

fn est_erreur_de_point(e: &ErreurIntegrale) -> bool {
    // seule issue légitime d'une somme sur entrée valide : f indéfinie
    // quelque part (le fuzz génère exprès des pôles et des débordements)
    matches!(e, ErreurIntegrale::Domaine { .. })
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let n = match rng.pick(9) {
        0 => "0",
        1 => "1",
        2 => "2",
        3 => "3",
        4 => "5",
        5 => "7",
        6 => "0.5",
        7 => "0.25",
        _ => "1.5",
    };
    n.to_string()
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 => "x".to_string(),
        2 => gen_nombre(rng),
        3 => "pi".to_string(),
        4 => "(x-1)".to_string(),
        _ => "(x+2)".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(9) {
        0 => gen_atom(rng),
        1 => format!(
            "({}+{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        2 => format!(
            "({}-{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        3 => {
            // produit ou puissance (la puissance sait déborder : c'est voulu)
            if rng.coin() {
                format!(
                    "({}*{})",
                    gen_expr(rng, depth - 1),
                    gen_expr(rng, depth - 1)
                )
            } else {
                format!(
                    "({}^{})",
                    gen_expr(rng, depth - 1),
                    gen_expr(rng, depth - 1)
                )
            }
        }
        4 => format!(
            "({}/{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        5 => format!("sin({})", gen_expr(rng, depth - 1)),
        6 => format!("cos({})", gen_expr(rng, depth - 1)),
        7 => {
            // pôle garanti sur la grille d'échantillonnage des tests
            let k = ["0", "1", "2", "(0-1)"][rng.pick(4) as usize];
            format!("(1/(x-{k}))")
        }
        _ => {
            if rng.coin() {
                format!("exp({})", gen_atom(rng))
            } else {
                "sqrt((x*x)+1)".to_string()
            }
        }
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_evaluer_jamais_de_nonfini() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let xs = [-2.5, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 3.0];
    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..120 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 5);
        let f = compile(&expr);

        for x in xs {
            match f.evaluer(x) {
                Ok(v) => {
                    assert!(v.is_finite(), "Ok(non-fini) pour expr={expr:?} x={x}");
                    seen_ok += 1;
                }
                Err(_) => {
                    // l'erreur est typée par construction (ErreurDomaine)
                    seen_err += 1;
                }
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 100, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_trapeze_reste_la_moyenne() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let segment = Intervalle::nouveau(0.25, 1.75).unwrap();

    let mut verifies = 0usize;

    for _ in 0..60 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);
        let f = compile(&expr);
        let n = 1 + rng.pick(64);

        let gauche = somme_riemann(&f, &segment, n, Variante::Gauche);
        let droite = somme_riemann(&f, &segment, n, Variante::Droite);

        let (g, d) = match (gauche, droite) {
            (Ok(g), Ok(d)) => (g, d),
            (Err(e), _) | (_, Err(e)) => {
                assert!(est_erreur_de_point(&e), "expr={expr:?} err={e}");
                continue;
            }
        };
        if !g.valeur.is_finite() || !d.valeur.is_finite() {
            // somme d'échantillons finis qui déborde en cumulant : hors sujet ici
            continue;
        }

        // gauche et droite couvrent ensemble tous les bords : trapèze doit suivre
        let t = somme_riemann(&f, &segment, n, Variante::Trapeze)
            .unwrap_or_else(|e| panic!("expr={expr:?} n={n} err={e}"));

        let moyenne = (g.valeur + d.valeur) / 2.0;
        let tol = 1e-12 * (1.0 + g.valeur.abs() + d.valeur.abs());
        assert!(
            (t.valeur - moyenne).abs() <= tol,
            "expr={expr:?} n={n} trapèze={} moyenne={moyenne}",
            t.valeur
        );

        // invariants de découpage, quel que soit f
        assert_eq!(t.tranches.len(), n as usize);
        assert_eq!(t.tranches[n as usize - 1].x_droite, 1.75);

        verifies += 1;
    }

    assert!(verifies > 20, "trop peu de paires comparées: {verifies}");
}

#[test]
fn fuzz_safe_profondeur_bornee_et_sommes_larges() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 800 termes balancés : profondeur ~10, doit passer large
    let expr = somme_balancee("x/2", 800);
    let f = compile(&expr);
    budget(t0, max);

    // f(x) = 400x sur [0,1], gauche n=8 : 400·(1/8)²·(0+1+...+7) = 175 exact
    let s = somme_riemann(&f, &Intervalle::nouveau(0.0, 1.0).unwrap(), 8, Variante::Gauche)
        .unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(s.valeur, 175.0);
    budget(t0, max);

    // 600 termes en chaîne : arbre dégénéré, le garde-fou de profondeur refuse
    let chaine = vec!["x"; 600].join("+");
    match Fonction::compiler(&chaine, "x") {
        Err(ErreurIntegrale::Analyse(msg)) => {
            assert!(msg.contains("profonde"), "{msg}");
        }
        autre => panic!("chaîne de 600 termes acceptée: {autre:?}"),
    }
    budget(t0, max);
}
