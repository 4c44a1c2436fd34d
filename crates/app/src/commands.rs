//! Command handlers: call into services and print what a learner would see.

use anyhow::{Context, Result, bail};
use finlingo_core::emergency::{Choice, EmergencyFundGame};
use finlingo_core::lessons;
use finlingo_core::model::{
    ChallengeId, GRID_SLOTS, LevelId, RewardOutcome, StarRating, StarRule, Theme, TileSelection,
    TileState, Username, format_cents, parse_cents,
};
use services::{AppServices, CompletionReport, HomeScreen, SubmitReport};

fn stars(rating: StarRating) -> String {
    let filled = usize::from(rating.value());
    let empty = usize::from(StarRating::MAX) - filled;
    format!("{}{}", "*".repeat(filled), ".".repeat(empty))
}

fn print_home(screen: &HomeScreen) {
    if let Some(notice) = &screen.notification {
        println!("** {notice} **");
    }
    println!("Unlocked up to level {}", screen.unlocked_level);
    let row = usize::from(GRID_SLOTS) / 3;
    for tiles in screen.tiles.chunks(row) {
        let line: Vec<String> = tiles
            .iter()
            .map(|tile| match tile.state {
                TileState::Open { stars: rating } => format!("[{:>2} {}]", tile.slot, stars(rating)),
                TileState::Locked => format!("[{:>2} lock]", tile.slot),
                TileState::ComingSoon => format!("[{:>2} soon]", tile.slot),
            })
            .collect();
        println!("{}", line.join(" "));
    }
}

pub async fn home(app: &AppServices, user: &Username) -> Result<()> {
    let screen = app.home().visit(user).await?;
    print_home(&screen);
    Ok(())
}

pub async fn open(app: &AppServices, user: &Username, slot: u32) -> Result<()> {
    let home = app.home();
    let screen = home.visit(user).await?;
    match home.select(&screen, slot) {
        TileSelection::Open(level) => {
            let levels = app.levels();
            let title = levels.catalog().get(level).map_or("", |def| def.title());
            println!("Level {level}: {title}");
            if let Some(def) = levels.catalog().get(level) {
                for spec in def.challenges() {
                    println!("  {:<16} {:<28} {:>3} coins", spec.id, spec.title, spec.reward);
                }
            }
        }
        TileSelection::Notice(notice) => println!("{notice}"),
    }
    Ok(())
}

fn print_submit(report: &SubmitReport) {
    match report.outcome {
        RewardOutcome::FirstTimeReward(coins) => {
            println!("  {}: correct! +{coins} coins", report.challenge);
        }
        RewardOutcome::AlreadyRewarded => {
            println!("  {}: correct (already completed)", report.challenge);
        }
        RewardOutcome::Incorrect => println!("  {}: not quite, try again", report.challenge),
    }
}

fn print_completion(report: &CompletionReport) {
    println!(
        "Level {} complete! {} (+{} bonus coins, {} total)",
        report.level,
        stars(report.earned_stars),
        report.bonus_coins,
        report.total_coins
    );
    if report.stored_stars > report.earned_stars {
        println!("Your best for this level stays at {}", stars(report.stored_stars));
    }
}

async fn ensure_unlocked(app: &AppServices, user: &Username, level: LevelId) -> Result<()> {
    let record = app.progress().load(user).await?;
    if level > record.unlocked_level() {
        bail!("Open level {} to unlock this level.", record.unlocked_level());
    }
    Ok(())
}

pub async fn play(
    app: &AppServices,
    user: &Username,
    level: LevelId,
    missed: &[ChallengeId],
    answers: &[(ChallengeId, String)],
    solved: &[ChallengeId],
) -> Result<()> {
    let levels = app.levels();
    if levels
        .catalog()
        .get(level)
        .is_some_and(|def| matches!(def.star_rule(), StarRule::EndingSavings { .. }))
    {
        bail!("Level {level} is played with the `emergency` command.");
    }
    if let Some(id) = missed.iter().chain(solved).find(|id| lessons::is_graded(id)) {
        bail!("{id} needs a typed answer: --answer {id}=VALUE");
    }
    ensure_unlocked(app, user, level).await?;

    let mut session = levels.start(user, level).await?;
    println!("Level {level}: {}", session.definition().title());

    for challenge in missed {
        let report = levels.submit(&mut session, challenge, false).await?;
        print_submit(&report);
    }
    let mut reports = Vec::new();
    for (challenge, answer) in answers {
        reports.push(levels.answer(&mut session, challenge, answer).await?);
    }
    for challenge in solved {
        reports.push(levels.submit(&mut session, challenge, true).await?);
    }
    for report in &reports {
        print_submit(report);
        if let Some(completion) = &report.completion {
            print_completion(completion);
        }
    }

    let (done, total) = session.progress();
    if session.completion().is_none() {
        println!("{done}/{total} challenges done");
    }
    levels.return_home(session);
    home(app, user).await
}

pub async fn emergency(app: &AppServices, user: &Username, choices: &[Choice]) -> Result<()> {
    let level = LevelId::LAST;
    ensure_unlocked(app, user, level).await?;
    let levels = app.levels();
    let mut session = levels.start(user, level).await?;
    let mut game = EmergencyFundGame::default();

    for choice in choices {
        let Some(scenario) = game.current().cloned() else {
            break;
        };
        println!(
            "Week {}: {} costs {} coins (savings {})",
            game.week(),
            scenario.title,
            scenario.cost,
            game.savings()
        );
        let decision = game.choose(*choice)?;
        if !decision.covered {
            println!("  Not enough savings to cover it, so nothing was paid.");
        }
        let report = levels.record_decision(&mut session, &decision).await?;
        print_submit(&report);
        if let Some(completion) = &report.completion {
            print_completion(completion);
        }
    }

    println!(
        "Savings {}, credit debt {}, score {}",
        game.savings(),
        game.credit_debt(),
        game.score()
    );
    levels.return_home(session);
    home(app, user).await
}

pub async fn status(app: &AppServices, user: &Username) -> Result<()> {
    let record = app.progress().load(user).await?;
    let prefs = app.prefs().load(user).await?;
    println!("Learner:  {user}");
    println!("Coins:    {}", record.total_coins());
    println!("Unlocked: level {}", record.unlocked_level());
    println!("Theme:    {}", prefs.theme);
    for level in LevelId::all() {
        let title = app
            .levels()
            .catalog()
            .get(level)
            .map_or("", |def| def.title());
        println!("  {level}. {title:<22} {}", stars(record.stars_for(level)));
    }
    Ok(())
}

pub async fn badges(app: &AppServices, user: &Username) -> Result<()> {
    let board = app.badges().board(user).await?;
    println!(
        "{} of {} badges earned ({} coins, {} levels done)",
        board.earned(),
        board.badges.len(),
        board.total_coins,
        board.completed_levels
    );
    for status in board.level_badges().chain(board.special_badges()) {
        let mark = if status.earned { "x" } else { " " };
        println!(
            "  [{mark}] {:<22} {}",
            status.badge.title, status.badge.requirement
        );
    }
    Ok(())
}

pub async fn theme(app: &AppServices, user: &Username, change: Option<Option<Theme>>) -> Result<()> {
    let prefs = app.prefs();
    let current = match change {
        None => prefs.load(user).await?,
        Some(Some(theme)) => prefs.set_theme(user, theme).await?,
        Some(None) => {
            prefs.reset(user).await?;
            prefs.load(user).await?
        }
    };
    println!("Theme: {}", current.theme);
    Ok(())
}

pub async fn goal_show(app: &AppServices, user: &Username) -> Result<()> {
    match app.goals().get(user).await? {
        Some(goal) => println!(
            "{}: {} of {} saved ({:.0}%)",
            goal.name(),
            format_cents(goal.saved()),
            format_cents(goal.price()),
            goal.progress_percent()
        ),
        None => println!("No savings goal yet. Try `goal create NAME PRICE`."),
    }
    Ok(())
}

pub async fn goal_create(app: &AppServices, user: &Username, name: &str, price: &str) -> Result<()> {
    let price = parse_cents(price).context("reading price")?;
    let goal = app.goals().create(user, name, price).await?;
    println!(
        "Saving for {} ({} to go)",
        goal.name(),
        format_cents(goal.remaining())
    );
    Ok(())
}

pub async fn goal_deposit(app: &AppServices, user: &Username, amount: &str) -> Result<()> {
    let amount = parse_cents(amount).context("reading amount")?;
    let report = app.goals().deposit(user, amount).await?;
    if report.just_reached {
        println!("You reached your goal: {}!", report.goal.name());
    } else {
        println!(
            "Added {}. {} to go.",
            format_cents(amount),
            format_cents(report.goal.remaining())
        );
    }
    Ok(())
}

pub async fn goal_reset(app: &AppServices, user: &Username) -> Result<()> {
    app.goals().reset(user).await?;
    println!("Goal jar emptied.");
    Ok(())
}
