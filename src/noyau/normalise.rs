// src/noyau/normalise.rs
//
// Normalisation de la casse des identifiants
// ------------------------------------------
// Un identifiant = [A-Za-z_][A-Za-z0-9_]* (ASCII, mot entier, jamais une sous-chaîne).
// - fonction connue  -> minuscules (SIN -> sin)
// - constante connue -> MAJUSCULES (pi -> PI)
// - sinon            -> recopié tel quel (rejeté ensuite par validation.rs)
//
// Le même scanner sert à la validation : une seule grammaire d'identifiant.

use super::registre::Registre;

fn debut_ident(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn suite_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Itère sur les identifiants d'une chaîne : (offset en octets, mot).
pub struct Identifiants<'a> {
    src: &'a str,
    pos: usize,
}

pub fn identifiants(src: &str) -> Identifiants<'_> {
    Identifiants { src, pos: 0 }
}

impl<'a> Iterator for Identifiants<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let reste = &self.src[self.pos..];
        let (rel, _) = reste.char_indices().find(|&(_, c)| debut_ident(c))?;
        let debut = self.pos + rel;

        // identifiants ASCII : la fin tombe toujours sur une frontière de char
        let fin = self.src[debut..]
            .char_indices()
            .find(|&(_, c)| !suite_ident(c))
            .map(|(i, _)| debut + i)
            .unwrap_or(self.src.len());

        self.pos = fin;
        Some((debut, &self.src[debut..fin]))
    }
}

/// Réécrit chaque identifiant reconnu dans sa casse canonique.
pub fn normalize(registre: &Registre, expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut copie = 0;

    for (debut, mot) in identifiants(expr) {
        out.push_str(&expr[copie..debut]);

        let canon = registre
            .fonction(mot)
            .or_else(|| registre.constante(mot))
            .unwrap_or(mot);
        out.push_str(canon);

        copie = debut + mot.len();
    }

    out.push_str(&expr[copie..]);
    out
}
