/// 화면 상태 모델
/// 컨트롤러는 문서 구조 대신 이 모델(제목, 표, 행, 셀)을 갱신한다.
// region:    --- Imports
use crate::model::{Article, Auction, AuctionId};

pub mod format;

// endregion: --- Imports

// region:    --- Label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub text: String,
    pub visible: bool,
}

impl Label {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
// endregion: --- Label

// region:    --- Table
/// 상품 이미지 표시 높이
pub const IMAGE_HEIGHT: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Empty,
    Image { src: String, height: u32 },
    // 선택 시 ShowAuction 이벤트를 발행하는 링크
    DetailsLink(AuctionId),
    Checkbox { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub rowspan: usize,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: CellContent::Text(text.into()),
            rowspan: 1,
        }
    }

    pub fn empty() -> Self {
        Self {
            content: CellContent::Empty,
            rowspan: 1,
        }
    }

    pub fn details_link(id: AuctionId) -> Self {
        Self {
            content: CellContent::DetailsLink(id),
            rowspan: 1,
        }
    }

    pub fn checkbox(name: &str, value: impl ToString) -> Self {
        Self {
            content: CellContent::Checkbox {
                name: name.to_string(),
                value: value.to_string(),
            },
            rowspan: 1,
        }
    }

    /// 상품 이미지 셀 (이미지가 없으면 빈 셀)
    pub fn article_image(article: &Article) -> Self {
        match article.image() {
            Some(src) => Self {
                content: CellContent::Image {
                    src: src.to_string(),
                    height: IMAGE_HEIGHT,
                },
                rowspan: 1,
            },
            None => Self::empty(),
        }
    }

    pub fn spanning(mut self, rowspan: usize) -> Self {
        self.rowspan = rowspan;
        self
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            CellContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn details_link(&self) -> Option<AuctionId> {
        self.cells.iter().find_map(|cell| match cell.content {
            CellContent::DetailsLink(id) => Some(id),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub visible: bool,
    pub rows: Vec<Row>,
}

impl TableView {
    pub fn replace(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// 첫 번째 "Show details" 링크
    pub fn first_details_link(&self) -> Option<AuctionId> {
        self.rows.iter().find_map(Row::details_link)
    }
}

/// 경매 하나와 상품 여러 개를 묶은 행 그룹
/// 경매 셀과 링크 셀은 첫 행에만 두고 상품 수만큼 rowspan을 준다.
/// 상품이 없으면 상품 칸 수(article_width)만큼 빈 셀을 채운다.
pub fn row_group(
    auction_cells: Vec<Cell>,
    article_cells: Vec<Vec<Cell>>,
    article_width: usize,
    trailing_cells: Vec<Cell>,
) -> Vec<Row> {
    let rowspan = article_cells.len().max(1);
    let mut articles = article_cells.into_iter();

    let mut first = Row::new(
        auction_cells
            .into_iter()
            .map(|cell| cell.spanning(rowspan))
            .collect(),
    );
    match articles.next() {
        Some(cells) => first.cells.extend(cells),
        None => first
            .cells
            .extend(std::iter::repeat_with(Cell::empty).take(article_width)),
    }
    first
        .cells
        .extend(trailing_cells.into_iter().map(|cell| cell.spanning(rowspan)));

    let mut rows = vec![first];
    rows.extend(articles.map(Row::new));
    rows
}
// endregion: --- Table

// region:    --- List View
/// 목록 컨트롤러 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    Hidden,
    Loading,
    Shown,
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    pub state: ListState,
    pub title: Label,
    pub table: TableView,
}

impl ListView {
    pub fn reset(&mut self) {
        self.state = ListState::Hidden;
        self.title.hide();
        self.table.hide();
    }

    pub fn loading(&mut self) {
        self.state = ListState::Loading;
    }

    pub fn shown(&mut self, title: impl Into<String>, rows: Vec<Row>) {
        self.state = ListState::Shown;
        self.title.show(title);
        self.table.replace(rows);
    }

    /// 빈 목록 또는 오류 메시지
    pub fn empty(&mut self, message: impl Into<String>) {
        self.state = ListState::Empty;
        self.title.show(message);
        self.table.rows.clear();
        self.table.hide();
    }
}
// endregion: --- List View

// region:    --- Details View
/// 낙찰 정보 (닫힌 경매만)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinnerView {
    pub username: String,
    pub final_bid: String,
    pub address: String,
}

/// 경매 상세 정보
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsView {
    pub visible: bool,
    pub title: String,
    pub creator: String,
    pub terminates_at: String,
    pub minimum_bid_wedge: String,
    pub closed: String,
    pub winner: Option<WinnerView>,
}

impl DetailsView {
    pub fn render(auction: &Auction, terminated: bool) -> Self {
        let winner = auction.closed_by_user.then(|| WinnerView {
            username: auction.winner_user_username.clone().unwrap_or_default(),
            final_bid: format::euro(auction.final_bid_amount.unwrap_or_default()),
            address: auction.winner_user_address.clone().unwrap_or_default(),
        });

        Self {
            visible: true,
            title: format!(
                "Auction #{} - {}",
                auction.id,
                if terminated { "Terminated" } else { "Open" }
            ),
            creator: auction.creator_user_username.clone(),
            terminates_at: format::date_time(auction.terminates_at),
            minimum_bid_wedge: format::euro(auction.minimum_bid_wedge as f64),
            closed: if auction.closed_by_user { "Yes" } else { "No" }.to_string(),
            winner,
        }
    }
}
// endregion: --- Details View
