use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use product_ledger::{cli, config, error, export, ledger, report, sheet, state};
use product_ledger_common::{favorites_across_all, parse_locale_decimal, table_filter, text_filter, ListName, Row};
use cli::{Cli, Commands, LinkAction};
use config::Config;
use error::LedgerError;
use ledger::Ledger;
use state::StateFiles;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = Config::load()?;
    let state_dir = config.resolve_state_dir(cli.state_dir.as_deref())?;
    log::debug!("状態ディレクトリ: {}", state_dir.display());

    match cli.command {
        Commands::Sheets { file } => {
            let workbook = sheet::read_workbook(&file)?;
            println!("📗 {}\n", file.display());
            for name in &workbook.sheet_names {
                let data = workbook.sheet(name)?;
                println!("  {} ({}行, {}列)", name, data.rows.len(), data.headers.len());
            }
        }

        Commands::Rows { file, sheet, filter, limit } => {
            let workbook = sheet::read_workbook(&file)?;
            let (sheet_name, data) = workbook.sheet_or_first(sheet.as_deref())?;
            let rows = filtered_rows(&data.rows, filter.as_deref());

            println!("📗 {} / {} ({}/{}行)\n", file.display(), sheet_name, rows.len(), data.rows.len());
            for (i, row) in rows.iter().take(limit).enumerate() {
                println!("{:>4}: {}", i + 1, report::row_line(&data.headers, row));
            }
            if rows.len() > limit {
                println!("  … 他 {}行", rows.len() - limit);
            }
        }

        Commands::Map { list, field, header, clear, reset } => {
            let list = list.unwrap_or(config.default_list);
            let mut ledger = Ledger::open(StateFiles::new(&state_dir));

            if reset {
                ledger.reset_mapping(list);
                println!("✔ {} の列マッピングを解除しました", list.title());
            } else if let Some(field) = field {
                if clear {
                    ledger.set_mapping_field(list, field, None);
                    println!("✔ {} の割り当てを解除しました", field.label());
                } else if let Some(header) = header.as_deref() {
                    ledger.set_mapping_field(list, field, Some(header));
                    println!("✔ {} ← {}", field.label(), header);
                } else {
                    bail!("--header か --clear を指定してください");
                }
            }

            let mapping = ledger.store().mapping(list);
            println!("\n{} の列マッピング:", list.title());
            for line in report::mapping_lines(mapping) {
                println!("  {}", line);
            }
            let missing = mapping.missing_required();
            if !missing.is_empty() {
                let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
                eprintln!("\n⚠ 未設定の必須項目: {}", labels.join(", "));
            }
        }

        Commands::Add { file, row, sheet, list } => {
            let list = list.unwrap_or(config.default_list);
            let workbook = sheet::read_workbook(&file)?;
            let (_, data) = workbook.sheet_or_first(sheet.as_deref())?;

            let target = row
                .checked_sub(1)
                .and_then(|i| data.rows.get(i))
                .ok_or(LedgerError::RowNotFound(row))?;

            let mut ledger = Ledger::open(StateFiles::new(&state_dir));
            let product = ledger.add_product(list, target)?;
            println!("✔ {} に追加しました", list.title());
            println!("  {}", report::product_line(&product, &config.currency));
        }

        Commands::AddAll { file, sheet, filter, list } => {
            let list = list.unwrap_or(config.default_list);
            let workbook = sheet::read_workbook(&file)?;
            let (sheet_name, data) = workbook.sheet_or_first(sheet.as_deref())?;
            let rows = filtered_rows(&data.rows, filter.as_deref());

            let mut ledger = Ledger::open(StateFiles::new(&state_dir));
            if !ledger.store().mapping(list).is_complete() {
                return Err(LedgerError::Engine(product_ledger_common::Error::MappingIncomplete).into());
            }

            println!("[1/1] {} / {} の{}行を {} に追加中...", file.display(), sheet_name, rows.len(), list.title());
            let summary = ledger.add_all_products(list, rows);
            println!(
                "✔ 追加 {}件 / 重複スキップ {}件 / 変換不可 {}件",
                summary.accepted, summary.skipped, summary.unmapped
            );
        }

        Commands::List { list, search } => {
            let list = list.unwrap_or(config.default_list);
            let ledger = Ledger::open(StateFiles::new(&state_dir));
            let products = ledger.store().get(list);
            let shown = text_filter(products, search.as_deref().unwrap_or(""));

            println!("{} ({}/{}件)\n", list.title(), shown.len(), products.len());
            for product in shown {
                println!("  {}", report::product_line(product, &config.currency));
            }
        }

        Commands::Favorites { search } => {
            let ledger = Ledger::open(StateFiles::new(&state_dir));
            let favorites = favorites_across_all(ledger.store());
            let shown = text_filter(favorites, search.as_deref().unwrap_or(""));

            println!("お気に入り ({}件)\n", shown.len());
            for product in shown {
                println!("  {}", report::product_line(product, &config.currency));
            }
        }

        Commands::Delete { barcode, yes } => {
            let mut ledger = Ledger::open(StateFiles::new(&state_dir));

            let description = match ledger.store().find_by_barcode(&barcode) {
                Some(product) => product.description.clone(),
                None => {
                    eprintln!("⚠ バーコード {} の商品はありません", barcode);
                    return Ok(());
                }
            };

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("「{}」({}) を全リストから削除しますか?", description, barcode))
                    .default(false)
                    .interact()
                    .context("確認プロンプトの表示に失敗しました")?;
                if !confirmed {
                    println!("中止しました");
                    return Ok(());
                }
            }

            let removed = ledger.delete_by_barcode(&barcode);
            println!("✔ {}件削除しました", removed);
        }

        Commands::Cost { barcode, value } => {
            let cost = parse_locale_decimal(&value);
            let mut ledger = Ledger::open(StateFiles::new(&state_dir));
            let updated = ledger.update_cost_by_barcode(&barcode, cost);
            if updated == 0 {
                eprintln!("⚠ バーコード {} の商品はありません", barcode);
            } else {
                println!("✔ 原価を {} に更新しました ({}件)", report::format_money(cost, &config.currency), updated);
            }
        }

        Commands::Favorite { barcode } => {
            let mut ledger = Ledger::open(StateFiles::new(&state_dir));
            let toggled = ledger.toggle_favorite_by_barcode(&barcode);
            match ledger.store().find_by_barcode(&barcode) {
                Some(product) if toggled > 0 => {
                    let mark = if product.is_favorite { "★ 追加" } else { "☆ 解除" };
                    println!("✔ お気に入り{} ({}件)", mark, toggled);
                }
                _ => eprintln!("⚠ バーコード {} の商品はありません", barcode),
            }
        }

        Commands::ExportBackup { output } => {
            let ledger = Ledger::open(StateFiles::new(&state_dir));
            if ledger.store().is_empty() {
                eprintln!("⚠ 書き出すデータがありません");
                return Ok(());
            }

            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let path = export::output_path_for(&output_dir, &export::default_backup_name(), "json");
            export::write_backup(&ledger.export_backup(), &path)?;
            println!("✔ バックアップを保存: {}", path.display());
        }

        Commands::ImportBackup { input } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("{} を読み込めません", input.display()))?;

            let mut ledger = Ledger::open(StateFiles::new(&state_dir));
            let summary = ledger.import_backup(&text)?;

            if summary.has_product_lists {
                println!(
                    "✔ 商品: 取込 {}件 / 破棄 {}件",
                    summary.products_merged, summary.products_dropped
                );
            }
            if summary.has_links {
                println!("✔ リンク: 取込 {}件 / 破棄 {}件", summary.links_merged, summary.links_dropped);
            }
            if !summary.has_product_lists && !summary.has_links {
                println!("取り込む内容がありませんでした");
            }
        }

        Commands::ExportRows { file, sheet, filter, output } => {
            let workbook = sheet::read_workbook(&file)?;
            let (sheet_name, data) = workbook.sheet_or_first(sheet.as_deref())?;
            let rows = filtered_rows(&data.rows, filter.as_deref());

            if rows.is_empty() {
                eprintln!("⚠ 書き出す行がありません");
                return Ok(());
            }

            let title = export::excel::sheet_title(sheet_name);
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let path = export::output_path_for(&output_dir, &format!("filtered-{}", title), "xlsx");
            export::excel::write_rows(&data.headers, &rows, &title, &path)?;
            println!("✔ {}行を保存: {}", rows.len(), path.display());
        }

        Commands::Link { action } => {
            let mut ledger = Ledger::open(StateFiles::new(&state_dir));
            match action {
                LinkAction::List => {
                    let links = ledger.store().links();
                    if links.is_empty() {
                        println!("リンクはありません");
                    }
                    for (i, link) in links.iter().enumerate() {
                        println!("{:>3}. {} - {}", i + 1, link.name, link.url);
                    }
                }
                LinkAction::Add { name, url } => {
                    let link = ledger.add_link(&name, &url)?;
                    println!("✔ リンクを追加: {} - {}", link.name, link.url);
                }
                LinkAction::Edit { number, name, url } => {
                    let index = ledger.link_index(number)?;
                    let link = ledger.edit_link(index, &name, &url)?;
                    println!("✔ リンクを更新: {} - {}", link.name, link.url);
                }
                LinkAction::Delete { number } => {
                    let index = ledger.link_index(number)?;
                    let link = ledger.delete_link(index)?;
                    println!("✔ リンクを削除: {}", link.name);
                }
            }
        }

        Commands::Config { set_state_dir, set_default_list, set_currency, show } => {
            let mut config = config;

            if let Some(dir) = set_state_dir {
                config.set_state_dir(dir)?;
                println!("✔ 保存先を設定しました");
            }

            if let Some(list) = set_default_list {
                config.set_default_list(list)?;
                println!("✔ 既定リストを {} に設定しました", list.title());
            }

            if let Some(currency) = set_currency {
                config.set_currency(currency)?;
                println!("✔ 通貨記号を設定しました");
            }

            if show {
                println!("設定:");
                println!("  保存先: {}", config.resolve_state_dir(cli.state_dir.as_deref())?.display());
                println!("  既定リスト: {}", config.default_list.title());
                println!("  通貨記号: {}", config.currency);
                println!("  リスト: {}", ListName::ALL.iter().map(|l| l.key()).collect::<Vec<_>>().join(", "));
            }
        }
    }

    Ok(())
}

/// 検索語があれば全セル検索で絞り込む
fn filtered_rows<'a>(rows: &'a [Row], filter: Option<&str>) -> Vec<&'a Row> {
    table_filter(rows, filter.unwrap_or(""))
}
