//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : jamais de panique, et tout Ok est un f64 fini

use std::time::{Duration, Instant};

use super::erreur::ErrorKind;
use super::fonctions::arite;
use super::registre::{CONSTANTES, FONCTIONS};
use super::{evaluate, EvalError};

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
    fn choix<'a>(&mut self, liste: &[&'a str]) -> &'a str {
        liste[self.pick(liste.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn check_invariant_fini(expr: &str, r: &Result<f64, EvalError>) {
    if let Ok(v) = r {
        assert!(v.is_finite(), "Ok non fini: expr={expr:?} v={v}");
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let a = rng.pick(100);
    match rng.pick(4) {
        0 => format!("{a}"),
        1 => format!("{a}.{}", rng.pick(1000)),
        2 => format!(".{}", rng.pick(100)),
        _ => "0".to_string(),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(4) {
        0 => rng.choix(CONSTANTES).to_string(),
        // casse quelconque : la normalisation doit rattraper
        1 => rng.choix(CONSTANTES).to_ascii_lowercase(),
        _ => gen_nombre(rng),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(8) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("{}*{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("{}/{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("-{}", gen_expr(rng, depth - 1)),
        6 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(4)),
        _ => {
            let f = rng.choix(FONCTIONS);
            // arité respectée : les erreurs viennent des domaines, pas de la grammaire
            let n = match arite(f) {
                Some((min, Some(max))) => min + rng.pick((max - min + 1) as u32) as usize,
                Some((min, None)) => min + rng.pick(3) as usize,
                None => 1,
            };
            let args: Vec<String> = (0..n).map(|_| gen_expr(rng, depth - 1)).collect();
            let nom = if rng.coin() { f.to_ascii_uppercase() } else { f.to_string() };
            format!("{nom}({})", args.join(", "))
        }
    }
}

/// Bruit : caractères quelconques (ASCII imprimable + quelques non-ASCII).
fn gen_bruit(rng: &mut Rng, n: usize) -> String {
    const ALPHABET: &[char] = &[
        '1', '2', '.', '+', '-', '*', '/', '^', '(', ')', ',', ' ', 'a', 'e', 'p', 'i', 's', 'n',
        '_', '"', '$', ';', '[', 'π', '√',
    ];
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_invariant_fini() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let r = evaluate(&expr, 10);
        check_invariant_fini(&expr, &r);

        // deux appels identiques => même résultat
        assert_eq!(r, evaluate(&expr, 10), "non déterministe: expr={expr:?}");

        match r {
            Ok(_) => seen_ok += 1,
            Err(e) => {
                // liste blanche respectée par construction
                assert_ne!(
                    e.kind(),
                    ErrorKind::UnknownIdentifier,
                    "expr={expr:?} err={e}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..400 {
        budget(t0, max);

        let n = rng.pick(40) as usize;
        let expr = gen_bruit(&mut rng, n);
        let r = evaluate(&expr, 5);
        check_invariant_fini(&expr, &r);

        if expr.trim().is_empty() {
            assert_eq!(r, Err(EvalError::Empty));
        }
    }
}

#[test]
fn fuzz_safe_identifiants_hors_liste() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0x5EED_u64);
    let intrus = ["window", "alert", "process", "constructor", "x", "e5", "Object", "_"];

    for _ in 0..100 {
        budget(t0, max);

        let base = gen_expr(&mut rng, 2);
        let nom = rng.choix(&intrus);
        let expr = if rng.coin() {
            format!("{base} + {nom}")
        } else {
            format!("{nom}({base})")
        };

        // un identifiant hors liste n'atteint jamais l'analyseur
        assert_eq!(
            evaluate(&expr, 5),
            Err(EvalError::UnknownIdentifier(nom.to_string())),
            "expr={expr:?}"
        );
    }
}
