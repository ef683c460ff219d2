// src/noyau/lecture.rs
//
// Arithmétique décimale étendue (entiers “scalés”)
// ------------------------------------------------
// Une valeur v est portée par l'entier V = v × 10^CHIFFRES (troncature).
// - + - × / : exacts jusqu'à la 64e décimale (0.1 + 0.2 == 0.3 exactement)
// - fonctions transcendantes : calculées avec GARDE chiffres de plus, puis tronquées
// - π (Machin) et ln 2 : mis en cache (lecture seule, OnceLock)
// - |v| > ~10^10000 : ±∞ (nombre.rs), jamais une erreur ici
//
// Lecture finale : arrondi (demi loin de zéro) à `precision` décimales, puis f64.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::sync::OnceLock;

use super::erreur::Defaut;
use super::nombre::Nombre;

/// Décimales de travail des valeurs sur la pile.
pub const CHIFFRES: usize = 64;

/// Chiffres supplémentaires pour les séries.
const GARDE: usize = 10;

const INTERNE: usize = CHIFFRES + GARDE;

/// 2^33432 > 10^(10000 + CHIFFRES)
const BITS_MAX: u64 = 33432;

/// log2|x^n| au-delà : dépassement certain (2^33220 > 10^10000).
const LOG2_MAX: i128 = 33220;

/// exp(x) au-delà : infini ; en deçà de -EXP_MAX : zéro.
const EXP_MAX: i64 = 23100;

/* ------------------------ Échelles ------------------------ */

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

fn echelle() -> &'static BigInt {
    static S: OnceLock<BigInt> = OnceLock::new();
    S.get_or_init(|| pow10(CHIFFRES))
}

fn echelle_interne() -> &'static BigInt {
    static S: OnceLock<BigInt> = OnceLock::new();
    S.get_or_init(|| pow10(INTERNE))
}

fn facteur_garde() -> &'static BigInt {
    static G: OnceLock<BigInt> = OnceLock::new();
    G.get_or_init(|| pow10(GARDE))
}

fn monter(x: &BigInt) -> BigInt {
    x * facteur_garde()
}

fn descendre(x: BigInt) -> BigInt {
    x / facteur_garde()
}

/// Valeur scalée -> Nombre ; hors plage : ±∞.
pub fn borne(x: BigInt) -> Nombre {
    if x.bits() > BITS_MAX {
        Nombre::infini(x.is_negative())
    } else {
        Nombre::Fini(x)
    }
}

/// Même plafond, à l'échelle interne.
fn deborde_interne(x: &BigInt) -> bool {
    x.bits() > BITS_MAX + facteur_garde().bits()
}

/// 1 (scalé)
pub fn un() -> BigInt {
    echelle().clone()
}

pub fn depuis_entier(n: i64) -> BigInt {
    BigInt::from(n) * echelle()
}

/// Littéral décimal (partie entière, partie fractionnaire) -> valeur scalée.
/// Les décimales au-delà de CHIFFRES sont tronquées.
pub fn depuis_decimal(entier: &str, frac: &str) -> Option<BigInt> {
    let mut chiffres = String::with_capacity(entier.len() + CHIFFRES + 1);
    chiffres.push_str(if entier.is_empty() { "0" } else { entier });

    let frac: String = frac.chars().take(CHIFFRES).collect();
    chiffres.push_str(&frac);
    for _ in frac.len()..CHIFFRES {
        chiffres.push('0');
    }

    BigInt::parse_bytes(chiffres.as_bytes(), 10)
}

/// Vrai si la valeur scalée est entière.
pub fn est_entier(x: &BigInt) -> bool {
    (x % echelle()).is_zero()
}

/// Partie entière (i64) d'une valeur entière scalée.
pub fn vers_i64(x: &BigInt) -> Option<i64> {
    (x / echelle()).to_i64()
}

pub fn entier_impair(x: &BigInt) -> bool {
    est_entier(x) && !((x / echelle()) % BigInt::from(2)).is_zero()
}

/* ------------------------ Opérations de base ------------------------ */

// + et - : directement sur les entiers scalés (nombre.rs).

pub fn produit(a: &BigInt, b: &BigInt) -> BigInt {
    (a * b) / echelle()
}

/// b ≠ 0 (nombre.rs traite la division par zéro).
pub fn quotient(a: &BigInt, b: &BigInt) -> BigInt {
    (a * echelle()) / b
}

/* ------------------------ Arrondi + conversion f64 ------------------------ */

/// Arrondi demi loin de zéro : entier m tel que x / 10^de ≈ m / 10^vers.
pub fn arrondi(x: &BigInt, de: usize, vers: usize) -> BigInt {
    if vers >= de {
        return x * pow10(vers - de);
    }

    let d = pow10(de - vers);
    let q = x / &d;
    let r = x % &d; // même signe que x

    if r.abs() * 2u32 >= d {
        q + x.signum()
    } else {
        q
    }
}

/// Arrondi d'une valeur scalée à `decimales`, résultat toujours scalé.
pub fn arrondi_scale(x: &BigInt, decimales: usize) -> BigInt {
    let d = decimales.min(CHIFFRES);
    arrondi(x, CHIFFRES, d) * pow10(CHIFFRES - d)
}

/// m / 10^decimales -> f64 (arrondi correct via l'analyseur de la std).
/// Trop grand => ±inf, que l'appelant classe.
pub fn vers_f64(m: &BigInt, decimales: usize) -> f64 {
    format!("{m}e-{decimales}").parse::<f64>().unwrap_or(f64::NAN)
}

/* ------------------------ Parties entières ------------------------ */

pub fn tronque(x: &BigInt) -> BigInt {
    (x / echelle()) * echelle()
}

pub fn plancher(x: &BigInt) -> BigInt {
    let t = tronque(x);
    if x.is_negative() && &t != x {
        t - echelle()
    } else {
        t
    }
}

pub fn plafond(x: &BigInt) -> BigInt {
    let t = tronque(x);
    if x.is_positive() && &t != x {
        t + echelle()
    } else {
        t
    }
}

pub fn signe(x: &BigInt) -> BigInt {
    x.signum() * echelle()
}

/* ------------------------ √ (Newton entier) ------------------------ */

/// floor(√n) par Newton, départ au-dessus de la racine.
fn racine_entiere(n: &BigInt) -> BigInt {
    if n.is_zero() {
        return BigInt::zero();
    }

    let mut y = BigInt::one() << ((n.bits() as usize + 1) / 2);
    loop {
        let suivant = (&y + n / &y) >> 1;
        if suivant >= y {
            return y;
        }
        y = suivant;
    }
}

pub fn sqrt(x: &BigInt) -> Result<BigInt, Defaut> {
    if x.is_negative() {
        return Err(Defaut::NonReel);
    }
    Ok(racine_entiere(&(x * echelle())))
}

/* ------------------------ π (Machin) + cache ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let denom = BigInt::from((2 * k + 1) as i64);
        let d = &q_pow * &denom;

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        sign_pos = !sign_pos;
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    // extra pour amortir les erreurs de troncature
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / pow10(extra)
}

fn pi_interne() -> &'static BigInt {
    static PI: OnceLock<BigInt> = OnceLock::new();
    PI.get_or_init(|| pi_scaled_compute(INTERNE))
}

fn demi_pi_interne() -> BigInt {
    pi_interne() / BigInt::from(2)
}

pub fn pi() -> BigInt {
    descendre(pi_interne().clone())
}

/* ------------------------ ln / exp ------------------------ */

/// atanh(z) = z + z^3/3 + z^5/5 + ...   (|z| ≤ 1/3 ici)
fn atanh_interne(z: &BigInt) -> BigInt {
    let s = echelle_interne();
    let z2 = (z * z) / s;

    let mut p = z.clone();
    let mut somme = BigInt::zero();
    let mut k: u64 = 1;

    while !p.is_zero() {
        somme += &p / BigInt::from(k);
        p = (&p * &z2) / s;
        k += 2;
    }

    somme
}

fn ln2_interne() -> &'static BigInt {
    static LN2: OnceLock<BigInt> = OnceLock::new();
    // ln 2 = 2·atanh(1/3)
    LN2.get_or_init(|| atanh_interne(&(echelle_interne() / BigInt::from(3))) * BigInt::from(2))
}

/// ln(x), x > 0 : x = m·2^k avec m ∈ (1/2, 2), ln m = 2·atanh((m-1)/(m+1)).
fn ln_interne(x: &BigInt) -> BigInt {
    let s = echelle_interne();
    let k = x.bits() as i64 - s.bits() as i64;

    let m = if k >= 0 {
        x.clone() >> (k as usize)
    } else {
        x.clone() << ((-k) as usize)
    };

    let z = ((&m - s) * s) / (&m + s);
    atanh_interne(&z) * BigInt::from(2) + ln2_interne() * BigInt::from(k)
}

/// exp(x) = 2^k · exp(r), x = k·ln2 + r, |r| < ln2. `None` : +∞.
fn exp_interne(x: &BigInt) -> Option<BigInt> {
    let s = echelle_interne();
    let limite = BigInt::from(EXP_MAX) * s;

    if x > &limite {
        return None;
    }
    if x < &-limite {
        return Some(BigInt::zero());
    }

    let ln2 = ln2_interne();
    let k = x / ln2;
    let r = x - &k * ln2;

    let mut terme = s.clone();
    let mut somme = BigInt::zero();
    let mut n: u64 = 1;
    while !terme.is_zero() {
        somme += &terme;
        terme = (&terme * &r) / (s * BigInt::from(n));
        n += 1;
    }

    // |k| ≤ EXP_MAX / ln 2
    let k = k.to_i64()?;
    Some(if k >= 0 {
        somme << (k as usize)
    } else {
        somme >> ((-k) as usize)
    })
}

pub fn exp(x: &BigInt) -> Nombre {
    match exp_interne(&monter(x)) {
        Some(e) => borne(descendre(e)),
        None => Nombre::PlusInf,
    }
}

/// ln à l'échelle interne ; `None` : ln(0) = -∞.
fn ln_verifie(x: &BigInt) -> Result<Option<BigInt>, Defaut> {
    if x.is_negative() {
        return Err(Defaut::NonReel);
    }
    if x.is_zero() {
        return Ok(None);
    }
    Ok(Some(ln_interne(&monter(x))))
}

pub fn ln(x: &BigInt) -> Result<Nombre, Defaut> {
    Ok(match ln_verifie(x)? {
        Some(l) => Nombre::Fini(descendre(l)),
        None => Nombre::MoinsInf,
    })
}

/// log_b(x) = ln x / ln b
pub fn log_base(x: &BigInt, base: &BigInt) -> Result<Nombre, Defaut> {
    match (ln_verifie(x)?, ln_verifie(base)?) {
        (Some(lx), Some(lb)) if !lb.is_zero() => {
            Ok(borne(descendre((lx * echelle_interne()) / lb)))
        }
        // ln b = 0 ou un ln infini : le quotient ne dépend plus de l'échelle
        (lx, lb) => Ok(super::nombre::div(&ln_etendu(lx), &ln_etendu(lb))),
    }
}

fn ln_etendu(l: Option<BigInt>) -> Nombre {
    l.map_or(Nombre::MoinsInf, Nombre::Fini)
}

/* ------------------------ Trigonométrie ------------------------ */

fn serie_sin(t: &BigInt) -> BigInt {
    let s = echelle_interne();
    let t2 = (t * t) / s;

    let mut terme = t.clone();
    let mut somme = BigInt::zero();
    let mut n: u64 = 1;
    while !terme.is_zero() {
        somme += &terme;
        terme = -(&terme * &t2) / (s * BigInt::from((n + 1) * (n + 2)));
        n += 2;
    }
    somme
}

fn serie_cos(t: &BigInt) -> BigInt {
    let s = echelle_interne();
    let t2 = (t * t) / s;

    let mut terme = s.clone();
    let mut somme = BigInt::zero();
    let mut n: u64 = 0;
    while !terme.is_zero() {
        somme += &terme;
        terme = -(&terme * &t2) / (s * BigInt::from((n + 1) * (n + 2)));
        n += 2;
    }
    somme
}

/// (sin x, cos x) : x = t + q·π/2, |t| < π/2, puis table des quadrants.
fn sin_cos_interne(x: &BigInt) -> (BigInt, BigInt) {
    let demi_pi = demi_pi_interne();
    let q = x / &demi_pi;
    let t = x - &q * &demi_pi;

    let quadrant = (&q % BigInt::from(4)).to_i64().unwrap_or(0).rem_euclid(4);
    let (st, ct) = (serie_sin(&t), serie_cos(&t));

    match quadrant {
        0 => (st, ct),
        1 => (ct, -st),
        2 => (-st, -ct),
        _ => (-ct, st),
    }
}

pub fn sin(x: &BigInt) -> BigInt {
    descendre(sin_cos_interne(&monter(x)).0)
}

pub fn cos(x: &BigInt) -> BigInt {
    descendre(sin_cos_interne(&monter(x)).1)
}

pub fn tan(x: &BigInt) -> Nombre {
    let (s, c) = sin_cos_interne(&monter(x));
    if c.is_zero() {
        return Nombre::infini(s.is_negative());
    }
    borne(descendre((s * echelle_interne()) / c))
}

/// atan : réduction |x| ≤ 1 (π/2 - atan(1/x)), deux demi-angles, puis série.
fn atan_interne(x: &BigInt) -> BigInt {
    let s = echelle_interne();
    let negatif = x.is_negative();

    let mut a = x.abs();
    let inverse = &a > s;
    if inverse {
        a = (s * s) / &a;
    }

    // tan(θ/2) = tan θ / (1 + √(1 + tan² θ))
    for _ in 0..2 {
        let rac = racine_entiere(&(s * s + &a * &a));
        a = (&a * s) / (s + rac);
    }

    let a2 = (&a * &a) / s;
    let mut p = a.clone();
    let mut somme = BigInt::zero();
    let mut k: u64 = 1;
    let mut signe_pos = true;
    while !p.is_zero() {
        let terme = &p / BigInt::from(k);
        if signe_pos {
            somme += terme;
        } else {
            somme -= terme;
        }
        p = (&p * &a2) / s;
        k += 2;
        signe_pos = !signe_pos;
    }

    let mut r = somme * BigInt::from(4);
    if inverse {
        r = demi_pi_interne() - r;
    }
    if negatif {
        -r
    } else {
        r
    }
}

pub fn atan(x: &BigInt) -> BigInt {
    descendre(atan_interne(&monter(x)))
}

fn asin_interne(x: &BigInt) -> Result<BigInt, Defaut> {
    let s = echelle_interne();
    let a = x.abs();

    if &a > s {
        return Err(Defaut::NonReel);
    }
    if &a == s {
        let dp = demi_pi_interne();
        return Ok(if x.is_negative() { -dp } else { dp });
    }

    // asin x = atan(x / √(1 - x²))
    let rac = racine_entiere(&(s * s - x * x));
    Ok(atan_interne(&((x * s) / rac)))
}

pub fn asin(x: &BigInt) -> Result<BigInt, Defaut> {
    Ok(descendre(asin_interne(&monter(x))?))
}

pub fn acos(x: &BigInt) -> Result<BigInt, Defaut> {
    let a = asin_interne(&monter(x))?;
    Ok(descendre(demi_pi_interne() - a))
}

/* ------------------------ Hyperboliques ------------------------ */

pub fn sinh(x: &BigInt) -> Nombre {
    let xi = monter(x);
    match (exp_interne(&xi), exp_interne(&-xi)) {
        (Some(ep), Some(em)) => borne(descendre((ep - em) / BigInt::from(2))),
        (None, _) => Nombre::PlusInf,
        (_, None) => Nombre::MoinsInf,
    }
}

pub fn cosh(x: &BigInt) -> Nombre {
    let xi = monter(x);
    match (exp_interne(&xi), exp_interne(&-xi)) {
        (Some(ep), Some(em)) => borne(descendre((ep + em) / BigInt::from(2))),
        _ => Nombre::PlusInf,
    }
}

pub fn tanh(x: &BigInt) -> BigInt {
    // |x| > 100 : tanh = ±1 à 64 décimales près
    if x.abs() > depuis_entier(100) {
        return signe(x);
    }

    let s = echelle_interne();
    match exp_interne(&(monter(x) * BigInt::from(2))) {
        Some(e2) => descendre(((&e2 - s) * s) / (&e2 + s)),
        None => signe(x),
    }
}

/* ------------------------ Puissances ------------------------ */

/// b^m à l'échelle interne, troncature à chaque produit. `None` : dépassement.
/// Pour b ≥ 1 les carrés successifs ne dépassent jamais b^m.
fn puissance_binaire(mut b: BigInt, mut m: u64) -> Option<BigInt> {
    let s = echelle_interne();
    let mut acc = s.clone();

    loop {
        if (m & 1) == 1 {
            acc = (&acc * &b) / s;
            if deborde_interne(&acc) {
                return None;
            }
        }
        m >>= 1;
        if m == 0 {
            return Some(acc);
        }
        b = (&b * &b) / s;
        if deborde_interne(&b) {
            return None;
        }
    }
}

/// x^n, n entier.
fn puissance_entiere(x: &BigInt, n: i64) -> Nombre {
    if n == 0 {
        return Nombre::un();
    }
    if x.is_zero() {
        return if n > 0 {
            Nombre::zero()
        } else {
            Nombre::PlusInf
        };
    }

    let negatif = x.is_negative() && n % 2 != 0;
    let m = n.unsigned_abs();

    // e ≈ log2|x| à ±1 près : on écarte ce qui dépasse forcément
    let e = x.bits() as i128 - echelle().bits() as i128;
    let certain = if n > 0 {
        e > 1 && (e - 1) * m as i128 > LOG2_MAX
    } else {
        e < -1 && (-e - 1) * m as i128 > LOG2_MAX
    };
    if certain {
        return Nombre::infini(negatif);
    }

    let s = echelle_interne();
    let a = monter(&x.abs());

    // n < 0 : on élève la plus grande de |x| et 1/|x|, pour ne pas s'écraser sur zéro
    let (base, inverser) = if n < 0 && &a < s {
        ((s * s) / &a, false)
    } else {
        (a, n < 0)
    };

    let p = match puissance_binaire(base, m) {
        Some(p) if inverser => (s * s) / p,
        Some(p) => p,
        None if inverser => return Nombre::zero(),
        None => return Nombre::infini(negatif),
    };

    let v = descendre(p);
    borne(if negatif { -v } else { v })
}

/// x^y = exp(y·ln x), x ≥ 0.
fn puissance_reelle(x: &BigInt, y: &BigInt) -> Nombre {
    if x.is_zero() {
        return if y.is_positive() {
            Nombre::zero()
        } else if y.is_zero() {
            Nombre::un()
        } else {
            Nombre::PlusInf
        };
    }

    let l = ln_interne(&monter(x));
    match exp_interne(&((monter(y) * l) / echelle_interne())) {
        Some(e) => borne(descendre(e)),
        None => Nombre::PlusInf,
    }
}

pub fn pow(x: &BigInt, y: &BigInt) -> Result<Nombre, Defaut> {
    if est_entier(y) {
        if let Some(k) = (y / echelle()).to_i64() {
            return Ok(puissance_entiere(x, k));
        }

        // exposant entier démesuré : le signe suit la parité
        if x.is_negative() {
            let m = puissance_reelle(&-x, y);
            return Ok(if entier_impair(y) { -m } else { m });
        }
        return Ok(puissance_reelle(x, y));
    }

    if x.is_negative() {
        return Err(Defaut::NonReel);
    }
    Ok(puissance_reelle(x, y))
}
