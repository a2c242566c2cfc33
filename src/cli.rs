use clap::{Parser, Subcommand};
use product_ledger_common::{ListName, ProductField};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "product-ledger")]
#[command(about = "スプレッドシート取込・商品リスト管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 状態ファイルの保存先（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ワークブックのシート一覧を表示
    Sheets {
        /// Excel/ODSファイル
        #[arg(required = true)]
        file: PathBuf,
    },

    /// シートの行を表示（検索語で絞り込み）
    Rows {
        /// Excel/ODSファイル
        #[arg(required = true)]
        file: PathBuf,

        /// シート名（省略時は先頭シート）
        #[arg(short, long)]
        sheet: Option<String>,

        /// 全セルに対する検索語
        #[arg(short, long)]
        filter: Option<String>,

        /// 表示する最大行数
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// 列マッピングを表示/編集
    Map {
        /// 対象リスト（省略時は設定の既定リスト）
        #[arg(short, long)]
        list: Option<ListName>,

        /// 割り当てるフィールド (barcode/description/price/commission/productUrl/photo1-3/data1-3)
        #[arg(long)]
        field: Option<ProductField>,

        /// 割り当てるヘッダー名
        #[arg(long, requires = "field")]
        header: Option<String>,

        /// フィールドの割り当てを解除
        #[arg(long, requires = "field", conflicts_with = "header")]
        clear: bool,

        /// リストの割り当てをすべて解除
        #[arg(long, conflicts_with = "field")]
        reset: bool,
    },

    /// シートの1行を商品として追加
    Add {
        /// Excel/ODSファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 行番号（データ行の1始まり）
        #[arg(short, long)]
        row: usize,

        /// シート名（省略時は先頭シート）
        #[arg(short, long)]
        sheet: Option<String>,

        /// 対象リスト
        #[arg(short, long)]
        list: Option<ListName>,
    },

    /// シートの行（絞り込み後）をまとめて追加
    AddAll {
        /// Excel/ODSファイル
        #[arg(required = true)]
        file: PathBuf,

        /// シート名（省略時は先頭シート）
        #[arg(short, long)]
        sheet: Option<String>,

        /// 全セルに対する検索語
        #[arg(short, long)]
        filter: Option<String>,

        /// 対象リスト
        #[arg(short, long)]
        list: Option<ListName>,
    },

    /// 保存済み商品を表示
    List {
        /// 対象リスト
        #[arg(short, long)]
        list: Option<ListName>,

        /// バーコード・商品説明の検索語
        #[arg(short, long)]
        search: Option<String>,
    },

    /// 全リストのお気に入り商品を表示
    Favorites {
        /// バーコード・商品説明の検索語
        #[arg(short, long)]
        search: Option<String>,
    },

    /// バーコードの商品を全リストから削除
    Delete {
        /// バーコード
        #[arg(required = true)]
        barcode: String,

        /// 確認せずに削除
        #[arg(short, long)]
        yes: bool,
    },

    /// バーコードの商品の原価を全リストで更新
    Cost {
        /// バーコード
        #[arg(required = true)]
        barcode: String,

        /// 原価（"12,50" 形式・負の値も可）
        #[arg(required = true, allow_hyphen_values = true)]
        value: String,
    },

    /// バーコードの商品のお気に入りを全リストで切り替え
    Favorite {
        /// バーコード
        #[arg(required = true)]
        barcode: String,
    },

    /// 全リストとリンクをJSONバックアップに書き出し
    ExportBackup {
        /// 出力ファイル/ディレクトリ（省略時はカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// JSONバックアップを現在の状態にマージ
    ImportBackup {
        /// バックアップJSONファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 絞り込んだシート行をExcelに書き出し
    ExportRows {
        /// Excel/ODSファイル
        #[arg(required = true)]
        file: PathBuf,

        /// シート名（省略時は先頭シート）
        #[arg(short, long)]
        sheet: Option<String>,

        /// 全セルに対する検索語
        #[arg(short, long)]
        filter: Option<String>,

        /// 出力ファイル/ディレクトリ（省略時はカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// リンク管理
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// 設定を表示/編集
    Config {
        /// 状態ファイルの保存先を設定
        #[arg(long)]
        set_state_dir: Option<PathBuf>,

        /// 既定リストを設定
        #[arg(long)]
        set_default_list: Option<ListName>,

        /// 通貨記号を設定
        #[arg(long)]
        set_currency: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum LinkAction {
    /// リンク一覧
    List,

    /// リンクを追加
    Add {
        /// 表示名
        #[arg(required = true)]
        name: String,

        /// URL (https://...)
        #[arg(required = true)]
        url: String,
    },

    /// リンクを編集
    Edit {
        /// 一覧の番号（1始まり）
        #[arg(required = true)]
        number: usize,

        /// 表示名
        #[arg(required = true)]
        name: String,

        /// URL
        #[arg(required = true)]
        url: String,
    },

    /// リンクを削除
    Delete {
        /// 一覧の番号（1始まり）
        #[arg(required = true)]
        number: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cost_accepts_negative_value() {
        let cli = Cli::try_parse_from(["product-ledger", "cost", "A1", "-5,5"]).unwrap();
        match cli.command {
            Commands::Cost { barcode, value } => {
                assert_eq!(barcode, "A1");
                assert_eq!(value, "-5,5");
            }
            _ => panic!("cost コマンドとして解析されませんでした"),
        }
    }

    #[test]
    fn test_map_header_requires_field() {
        assert!(Cli::try_parse_from(["product-ledger", "map", "--header", "Barkod"]).is_err());
        assert!(Cli::try_parse_from(["product-ledger", "map", "--field", "price", "--header", "Fiyat"]).is_ok());
    }
}
