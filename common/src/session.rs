//! キャプチャ/セッションコントローラ
//!
//! カメラ取得・静止画取り込み・フレームキャプチャ・解析呼び出しを
//! 管理する状態機械。外部コラボレータ（カメラ能力・解析クライアント）
//! はトレイトで抽象化し、描画層は `SessionSnapshot` の純粋な投影と
//! して実装する。
//!
//! 不変条件:
//! - ライブカメラと静止画は同時に有効にならない（取得は他方を破棄）
//! - ストリームハンドルは全ての経路（明示解放・置換・Drop）で解放される
//! - 多重解析は排他しない: 後に完了した呼び出しが結果を上書きする

use std::cell::RefCell;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::{Facing, Identification, Mode};

/// 取得済みカメラストリームのハンドル（外部コラボレータ）
pub trait CameraHandle {
    /// ストリームを解放する
    ///
    /// 多重呼び出しされないことはセッション側が保証する
    fn release(&mut self);

    /// 現在のフレームを静止画（data URL）としてサンプリングする
    fn capture_frame(&self) -> Result<String>;
}

/// カメラ取得能力（外部コラボレータ）
#[async_trait(?Send)]
pub trait CameraAccess {
    type Handle: CameraHandle;

    /// 指定向きのストリームを要求する
    ///
    /// # Returns
    /// * `Ok(Handle)` - 取得成功
    /// * `Err(CameraUnavailable)` - 権限拒否またはデバイスなし
    async fn request_stream(&self, facing: Facing) -> Result<Self::Handle>;
}

/// 画像解析クライアント（外部コラボレータ）
#[async_trait(?Send)]
pub trait IdentificationClient {
    /// data URL形式の静止画をモード指定で解析する
    async fn analyze(&self, image: &str, mode: Mode) -> Result<Vec<Identification>>;
}

/// セッションの作業状態（状態機械本体）
///
/// 遷移メソッドは同期的で、非同期操作の前後に分割して適用する
/// （RefCell借用をawaitを跨いで保持しないため）。多重解析の
/// 後勝ち挙動は `begin_analysis` / `finish_analysis` の分割が
/// そのまま表現する。
pub struct Session<H: CameraHandle> {
    mode: Mode,
    facing: Facing,
    camera: Option<H>,
    still_image: Option<String>,
    identifications: Vec<Identification>,
    analyzing: bool,
    last_error: Option<Error>,
    selected: Option<usize>,
}

impl<H: CameraHandle> Default for Session<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CameraHandle> Session<H> {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            facing: Facing::default(),
            camera: None,
            still_image: None,
            identifications: Vec::new(),
            analyzing: false,
            last_error: None,
            selected: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    pub fn still_image(&self) -> Option<&str> {
        self.still_image.as_deref()
    }

    pub fn identifications(&self) -> &[Identification] {
        &self.identifications
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// 既存ストリームを解放する（未取得なら何もしない）
    pub fn release_camera(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.release();
        }
    }

    /// 要求前の準備: 既存ストリームを解放し、向きを記録する
    pub fn prepare_camera_request(&mut self, facing: Facing) {
        self.release_camera();
        self.facing = facing;
    }

    /// カメラ要求の結果を取り込む
    ///
    /// 成功時はライブカメラ状態に入り、静止画・識別結果・エラーを
    /// 破棄する。失敗時はカメラなし状態のままエラーを記録する
    pub fn adopt_camera(&mut self, result: Result<H>) {
        match result {
            Ok(handle) => {
                self.release_camera();
                self.camera = Some(handle);
                self.still_image = None;
                self.identifications.clear();
                self.selected = None;
                self.last_error = None;
            }
            Err(error) => {
                self.release_camera();
                self.last_error = Some(error);
            }
        }
    }

    /// アップロード画像を現在のビューソースにする
    ///
    /// アクティブなカメラストリームは解放される（排他不変条件）
    pub fn adopt_still_image(&mut self, data_url: String) {
        self.release_camera();
        self.still_image = Some(data_url);
        self.identifications.clear();
        self.selected = None;
        self.last_error = None;
    }

    /// ライブ映像から静止画をサンプリングする
    ///
    /// # Returns
    /// * `Ok(String)` - data URL形式の静止画
    /// * `Err(CaptureUnavailable)` - ライブカメラがない場合
    pub fn capture_frame(&self) -> Result<String> {
        match &self.camera {
            Some(camera) => camera.capture_frame(),
            None => Err(Error::CaptureUnavailable),
        }
    }

    /// 解析開始: 直前の識別結果とエラーを破棄して解析中にする
    pub fn begin_analysis(&mut self) {
        self.identifications.clear();
        self.selected = None;
        self.last_error = None;
        self.analyzing = true;
    }

    /// 解析結果を取り込む
    ///
    /// 多重解析は排他しないため、後に完了した呼び出しの結果が
    /// 識別結果リストと解析中フラグを上書きする（後勝ち）。
    /// 失敗してもビューソースには触れない
    pub fn finish_analysis(&mut self, result: Result<Vec<Identification>>) {
        self.analyzing = false;
        match result {
            Ok(identifications) => {
                self.identifications = identifications;
            }
            Err(error) => {
                self.identifications.clear();
                self.selected = None;
                self.last_error = Some(error);
            }
        }
    }

    /// モード切替
    ///
    /// 識別結果は旧モードのスキーマに属し再解釈できないため
    /// 無条件に破棄する。再解析は自動では行わない
    pub fn change_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.identifications.clear();
        self.selected = None;
    }

    /// エラーを記録する（同期的な失敗経路用）
    pub fn set_error(&mut self, error: Error) {
        self.last_error = Some(error);
    }

    /// 識別結果を選択する（範囲外は無視）
    pub fn select_identification(&mut self, index: usize) {
        if index < self.identifications.len() {
            self.selected = Some(index);
        }
    }

    /// 選択を解除する
    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    /// 描画用スナップショットを生成する
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            facing: self.facing,
            has_camera: self.camera.is_some(),
            still_image: self.still_image.clone(),
            identifications: self.identifications.clone(),
            analyzing: self.analyzing,
            last_error: self.last_error.clone(),
            selected: self
                .selected
                .and_then(|index| self.identifications.get(index).cloned()),
        }
    }
}

impl<H: CameraHandle> Drop for Session<H> {
    fn drop(&mut self) {
        // コンポーネント破棄時にもストリームを解放する
        self.release_camera();
    }
}

/// セッション状態の描画用スナップショット
///
/// 描画層はこの値の純粋な投影として実装する
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub facing: Facing,
    pub has_camera: bool,
    pub still_image: Option<String>,
    pub identifications: Vec<Identification>,
    pub analyzing: bool,
    pub last_error: Option<Error>,
    pub selected: Option<Identification>,
}

impl SessionSnapshot {
    /// カメラも静止画もない状態（持続的な「カメラなし」表示の条件）
    pub fn camera_missing(&self) -> bool {
        !self.has_camera && self.still_image.is_none()
    }
}

/// 状態変化の通知コールバック
pub type Observer = Box<dyn Fn(SessionSnapshot)>;

/// セッションコントローラ
///
/// 状態機械と外部コラボレータを束ね、`&self` の非同期操作として
/// 遷移を公開する。内部借用はawaitを跨いで保持しないため、
/// 同一コントローラへの多重呼び出し（多重解析を含む）が可能で、
/// 結果は後勝ちになる。変化のたびにオブザーバへスナップショットを
/// 通知する
pub struct SessionController<P: CameraAccess, C: IdentificationClient> {
    camera: P,
    client: C,
    session: RefCell<Session<P::Handle>>,
    observer: RefCell<Option<Observer>>,
}

impl<P: CameraAccess, C: IdentificationClient> SessionController<P, C> {
    pub fn new(camera: P, client: C) -> Self {
        Self {
            camera,
            client,
            session: RefCell::new(Session::new()),
            observer: RefCell::new(None),
        }
    }

    /// オブザーバを登録し、現在のスナップショットを即時通知する
    pub fn set_observer(&self, observer: impl Fn(SessionSnapshot) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
        self.notify();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.borrow().snapshot()
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Session<P::Handle>) -> R) -> R {
        let result = {
            let mut session = self.session.borrow_mut();
            f(&mut session)
        };
        self.notify();
        result
    }

    fn notify(&self) {
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(self.session.borrow().snapshot());
        }
    }

    /// カメラを（再）取得する
    ///
    /// 既存ストリームは必ず要求前に解放する（デバイスリーク防止）。
    /// 繰り返し呼び出し（リセット・向き切替）に対して安全
    pub async fn acquire_camera(&self, facing: Facing) {
        self.mutate(|session| session.prepare_camera_request(facing));
        let result = self.camera.request_stream(facing).await;
        self.mutate(|session| session.adopt_camera(result));
    }

    /// 前面/背面を切り替えて再取得する
    pub async fn toggle_facing(&self) {
        let next = self.session.borrow().facing().opposite();
        self.acquire_camera(next).await;
    }

    /// 現在の向きでカメラを取得し直す
    pub async fn reset_camera(&self) {
        let facing = self.session.borrow().facing();
        self.acquire_camera(facing).await;
    }

    /// アップロード画像を取り込み、即座に解析する
    pub async fn select_still_image(&self, data_url: String) {
        self.mutate(|session| session.adopt_still_image(data_url.clone()));
        self.analyze(data_url).await;
    }

    /// ライブ映像から1フレームをキャプチャして解析する
    ///
    /// 有効なフレームがない場合はリモートを呼ばず同期的に
    /// エラーを記録する
    pub async fn trigger_scan(&self) {
        let frame = self.session.borrow().capture_frame();
        match frame {
            Ok(image) => self.analyze(image).await,
            Err(error) => self.mutate(|session| session.set_error(error)),
        }
    }

    /// 静止画を解析する
    ///
    /// 解析中の再呼び出しは重複排除もキャンセルもせず並行実行する。
    /// 後に完了した呼び出しの結果が見える（後勝ち）
    pub async fn analyze(&self, image: String) {
        let mode = self.mutate(|session| {
            session.begin_analysis();
            session.mode()
        });
        let result = self.client.analyze(&image, mode).await;
        self.mutate(|session| session.finish_analysis(result));
    }

    /// モード切替（識別結果は破棄、再解析はしない）
    pub fn change_mode(&self, mode: Mode) {
        self.mutate(|session| session.change_mode(mode));
    }

    /// 識別結果を選択する
    pub fn select_identification(&self, index: usize) {
        self.mutate(|session| session.select_identification(index));
    }

    /// 選択中の識別結果を閉じる
    pub fn dismiss(&self) {
        self.mutate(|session| session.dismiss());
    }

    /// ストリームを明示的に解放する（破棄時用）
    pub fn release(&self) {
        self.mutate(|session| session.release_camera());
    }
}
