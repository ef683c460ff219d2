// src/main.rs
//
// Calculatrice : point d'entrée terminal
// --------------------------------------
// - Avec une expression : évaluation unique, code de sortie 1 en cas d'erreur
// - Sans expression      : boucle interactive ligne à ligne (historique en mémoire)
// - Logs (tracing) sur stderr, filtre RUST_LOG (défaut: warn)

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use calculatrice_sure::app::vue::{rendre_demarche, rendre_etat, AIDE};
use calculatrice_sure::app::{EtatResultat, Session};
use calculatrice_sure::noyau::eval::PRECISION_MAX;
use calculatrice_sure::{Config, Reponse};

/// Titre unique (aide + bannière).
const TITRE_APP: &str = "Calculatrice sûre";

#[derive(Parser, Debug)]
#[command(name = "calculatrice", version, about = TITRE_APP)]
struct Cli {
    /// Décimales du résultat (0 à 64)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=PRECISION_MAX as i64))]
    precision: Option<u32>,

    /// Sortie JSON ({"ok":…,"value"|"error":…})
    #[arg(long)]
    json: bool,

    /// Fichier de configuration TOML
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Affiche la démarche (forme normalisée, jetons, RPN)
    #[arg(long)]
    demarche: bool,

    /// Expression à évaluer (les mots sont joints par des espaces)
    expression: Vec<String>,
}

fn installer_logs() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    installer_logs();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .context("chargement de la configuration")?
        .fusionner(cli.precision);
    tracing::debug!(?config, "configuration effective");

    let mut session = Session::new(&config);

    if cli.expression.is_empty() {
        boucle(&mut session, &cli)?;
        return Ok(ExitCode::SUCCESS);
    }

    let expression = cli.expression.join(" ");
    let etat = session.saisir(expression.as_str()).clone();
    afficher(&session, &etat, &expression, &cli);

    Ok(if etat.est_erreur() || etat == EtatResultat::Attente {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/* ------------------------ Sorties ------------------------ */

fn afficher(session: &Session, etat: &EtatResultat, expression: &str, cli: &Cli) {
    if cli.json {
        let reponse: Reponse = etat.reponse();
        match serde_json::to_string(&reponse) {
            Ok(s) => println!("{s}"),
            Err(e) => tracing::error!(%e, "sérialisation JSON"),
        }
    } else {
        match etat {
            EtatResultat::Valeur(v) => println!("{v}"),
            _ => println!("{}", rendre_etat(etat)),
        }
    }

    if cli.demarche {
        if let Ok(d) = session.evaluateur().demarche(expression) {
            eprintln!("{}", rendre_demarche(&d));
        }
    }
}

/* ------------------------ Boucle interactive ------------------------ */

fn boucle(session: &mut Session, cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{TITRE_APP} (précision {}), :help pour l'aide", session.precision());

    loop {
        print!("> ");
        stdout.flush().context("écriture sur stdout")?;

        let mut ligne = String::new();
        let lus = stdin
            .lock()
            .read_line(&mut ligne)
            .context("lecture de l'entrée")?;
        if lus == 0 {
            break;
        }

        let ligne = ligne.trim();
        if ligne.is_empty() {
            continue;
        }

        match ligne.split_once(char::is_whitespace).unwrap_or((ligne, "")) {
            (":quit" | ":q", _) => break,
            (":help", _) => println!("{AIDE}"),
            (":history", _) => println!("{}", session.rendu_historique()),
            (":clear", _) => {
                session.vider_historique();
                println!("historique vidé");
            }
            (":recall", arg) => match lire_id(arg) {
                Some(id) if session.rappeler(id) => {
                    println!("{}  {}", session.entree(), session.rendu());
                }
                _ => println!("! identifiant inconnu: {}", arg.trim()),
            },
            (":delete", arg) => match lire_id(arg) {
                Some(id) if session.supprimer(id) => println!("supprimé"),
                _ => println!("! identifiant inconnu: {}", arg.trim()),
            },
            (cmd, _) if cmd.starts_with(':') => println!("! commande inconnue: {cmd}"),
            _ => {
                session.saisir(ligne);
                let etat = match session.soumettre() {
                    Ok(item) => EtatResultat::Valeur(item.result),
                    Err(_) => session.etat().clone(),
                };
                afficher(session, &etat, ligne, cli);
            }
        }
    }

    Ok(())
}

fn lire_id(arg: &str) -> Option<Uuid> {
    Uuid::parse_str(arg.trim()).ok()
}
