use std::error::Error;
use std::process::exit;

use clap::Parser;
use rand::{Rng, seq::SliceRandom};
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    Transaction, TransactionFilters, TransactionKind, UserId, calculate_stats,
    create_transaction, delete_user_transactions, initialize_db, list_transactions,
};

const EXPENSE_CATEGORIES: [&str; 10] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Personal Care",
    "Groceries",
];

const INCOME_CATEGORIES: [&str; 6] = [
    "Salary",
    "Freelance",
    "Investment",
    "Gift",
    "Bonus",
    "Refund",
];

const EXPENSE_DESCRIPTIONS: [&str; 12] = [
    "Lunch at restaurant",
    "Coffee and snacks",
    "Grocery shopping",
    "Gas for car",
    "Movie tickets",
    "Electric bill",
    "Internet bill",
    "Gym membership",
    "Medical checkup",
    "Weekend trip",
    "Dinner with friends",
    "Streaming subscription",
];

const INCOME_DESCRIPTIONS: [&str; 8] = [
    "Monthly salary",
    "Freelance project payment",
    "Investment return",
    "Birthday gift",
    "Year-end bonus",
    "Tax refund",
    "Consulting work",
    "Stock dividend",
];

/// Transactions are dated up to this many days in the past.
const MAX_DAYS_AGO: i64 = 90;

/// Fill the expense tracker database with sample transactions for one user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The user that will own the sample transactions, e.g. "demo-user".
    user_id: String,

    /// How many transactions to create.
    #[arg(short, long, default_value_t = 50)]
    count: usize,

    /// Delete the user's existing transactions first.
    #[arg(long)]
    replace: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let user_id = UserId::parse(Some(args.user_id.as_str()))?;

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let existing = list_transactions(&user_id, &TransactionFilters::default(), &conn)?.len();
    if existing > 0 {
        if !args.replace {
            eprintln!(
                "User {user_id} already has {existing} transactions. Pass --replace to delete them first."
            );
            exit(1);
        }

        println!("Deleting {existing} existing transactions...");
        delete_user_transactions(&user_id, &conn)?;
    }

    println!("Creating {} transactions for user {user_id}...", args.count);

    let mut rng = rand::thread_rng();
    let now = OffsetDateTime::now_utc();
    let mut created = Vec::with_capacity(args.count);

    for _ in 0..args.count {
        let is_expense = rng.gen_bool(0.7);
        let (kind, categories, descriptions, amount_range) = if is_expense {
            (
                TransactionKind::Expense,
                &EXPENSE_CATEGORIES[..],
                &EXPENSE_DESCRIPTIONS[..],
                5.0..500.0,
            )
        } else {
            (
                TransactionKind::Income,
                &INCOME_CATEGORIES[..],
                &INCOME_DESCRIPTIONS[..],
                500.0..5000.0,
            )
        };

        let category = categories.choose(&mut rng).copied().unwrap_or("Other");
        let description = descriptions.choose(&mut rng).copied().unwrap_or_default();
        let amount: f64 = rng.gen_range(amount_range);
        let amount = (amount * 100.0).round() / 100.0;
        let date = now - Duration::days(rng.gen_range(0..MAX_DAYS_AGO));

        let transaction = create_transaction(
            Transaction::build(user_id.clone(), kind, amount, category, date)
                .description(description),
            &conn,
        )?;
        created.push(transaction);
    }

    let stats = calculate_stats(&created);

    println!("Total expenses: {:.2}", stats.total_expenses);
    println!("Total income: {:.2}", stats.total_income);
    println!("Balance: {:.2}", stats.balance);
    println!("Success!");

    Ok(())
}
