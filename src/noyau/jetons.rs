// src/noyau/jetons.rs

use num_bigint::BigInt;

use super::erreur::EvalError;
use super::lecture::depuis_decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    /// Valeur décimale déjà scalée (voir lecture.rs).
    Num(BigInt),

    // Fonction ou constante : le parse (rpn.rs) tranche via le registre.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^
    Virgule,

    LPar,
    RPar,
}

/// Jeton + position (index de caractère, base 0) + texte source.
#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    pub pos: usize,
    pub texte: String,
}

/// Tokenize une chaîne (déjà normalisée) en jetons.
/// Supporte:
/// - décimaux : 12, 1.5, .5, 5.
/// - opérateurs + - * / ^ et la virgule (arguments)
/// - parenthèses ( )
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (casse conservée)
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, EvalError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            ',' => Some(Tok::Virgule),
            _ => None,
        };
        if let Some(tok) = simple {
            out.push(Jeton {
                tok,
                pos: i,
                texte: c.to_string(),
            });
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Jeton {
                tok: Tok::Ident(word.clone()),
                pos: start,
                texte: word,
            });
            continue;
        }

        // Nombre décimal (point en tête accepté si suivi d'un chiffre)
        let point_chiffre =
            c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit();
        if c.is_ascii_digit() || point_chiffre {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let entier: String = chars[start..i].iter().collect();

            let mut frac = String::new();
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    frac.push(chars[i]);
                    i += 1;
                }
            }

            let texte: String = chars[start..i].iter().collect();
            let v = depuis_decimal(&entier, &frac).ok_or_else(|| {
                EvalError::syntaxe(format!("Invalid number \"{texte}\" (char {})", start + 1))
            })?;

            out.push(Jeton {
                tok: Tok::Num(v),
                pos: start,
                texte,
            });
            continue;
        }

        return Err(EvalError::syntaxe(format!(
            "Unexpected character \"{c}\" (char {})",
            i + 1
        )));
    }

    Ok(out)
}

/// Format utilitaire (debug) : liste de jetons en texte.
pub fn format_tokens(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| j.texte.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::lecture::depuis_entier;

    fn toks(s: &str) -> Vec<Tok> {
        tokenize(s).unwrap().into_iter().map(|j| j.tok).collect()
    }

    #[test]
    fn operateurs_et_parentheses() {
        assert_eq!(
            toks("(1+2)*3^4/5-6,"),
            vec![
                Tok::LPar,
                Tok::Num(depuis_entier(1)),
                Tok::Plus,
                Tok::Num(depuis_entier(2)),
                Tok::RPar,
                Tok::Star,
                Tok::Num(depuis_entier(3)),
                Tok::Caret,
                Tok::Num(depuis_entier(4)),
                Tok::Slash,
                Tok::Num(depuis_entier(5)),
                Tok::Minus,
                Tok::Num(depuis_entier(6)),
                Tok::Virgule,
            ]
        );
    }

    #[test]
    fn nombres_decimaux() {
        assert_eq!(toks(".5"), toks("0.5"));
        assert_eq!(toks("5."), toks("5"));
        assert_eq!(format_tokens(&tokenize("10000*.5").unwrap()), "10000 * .5");
    }

    #[test]
    fn identifiants_et_positions() {
        let j = tokenize("  max(PI, x_1)").unwrap();
        assert_eq!(j[0].tok, Tok::Ident("max".into()));
        assert_eq!(j[0].pos, 2);
        assert_eq!(j[2].tok, Tok::Ident("PI".into()));
        assert_eq!(j[4].tok, Tok::Ident("x_1".into()));
        assert_eq!(j[4].pos, 10);
    }

    #[test]
    fn caractere_inattendu() {
        assert_eq!(
            tokenize("1 + $"),
            Err(EvalError::Syntax("Unexpected character \"$\" (char 5)".into()))
        );
        assert_eq!(
            tokenize("π"),
            Err(EvalError::Syntax("Unexpected character \"π\" (char 1)".into()))
        );
        assert!(tokenize(".").is_err());
    }
}
