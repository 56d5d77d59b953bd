//! Trading module endpoints.
//!
//! This module implements API endpoints for positions, working orders,
//! deal confirmations and account history.

use crate::client::CapitalClient;
use crate::errors::CapitalError;
use crate::helpers::{parse_json, with_query, with_segment};
use crate::trading::models::{
    ActivityHistoryQuery, ActivityHistoryResponse, ClosePositionRequest,
    CreateWorkingOrderRequest, DealConfirmation, DealReferenceResponse, Direction,
    GetPositionsResponse, GetWorkingOrdersResponse, OpenPositionRequest, PositionDetails,
    TransactionHistoryQuery, TransactionHistoryResponse, UpdatePositionRequest,
    UpdateWorkingOrderRequest, WorkingOrderDetails,
};


const POSITIONS: &str = "/positions";
const POSITION: &str = "/positions/{}";
const WORKING_ORDERS: &str = "/workingorders";
const WORKING_ORDER: &str = "/workingorders/{}";
const GET_CONFIRM: &str = "/confirms/{}";
const GET_ACTIVITY_HISTORY: &str = "/history/activity";
const GET_TRANSACTION_HISTORY: &str = "/history/transactions";


impl CapitalClient {

    /// Get all open positions.
    ///
    /// **Endpoint:** `GET /positions`
    pub async fn get_positions(&self) -> Result<GetPositionsResponse, CapitalError> {
        let resp = self.authenticated_get(POSITIONS).await?;
        parse_json(&resp)
    }


    /// Get a single open position.
    ///
    /// **Endpoint:** `GET /positions/{dealId}`
    pub async fn get_position(&self, deal_id: &str) -> Result<PositionDetails, CapitalError> {
        let url = with_segment(POSITION, deal_id);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Open a position.
    ///
    /// **Endpoint:** `POST /positions`
    ///
    /// # Example
    /// ```no_run
    /// # use capital_rs::CapitalClient;
    /// use capital_rs::trading::models::{Direction, OpenPositionRequest};
    /// # async fn example(client: &CapitalClient) -> Result<(), capital_rs::CapitalError> {
    /// let order = OpenPositionRequest::new("GOLD", Direction::Buy, 1.0).stop_level(1900.0);
    /// let deal = client.open_position(&order).await?;
    /// let confirmation = client.get_deal_confirmation(&deal.deal_reference).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open_position(
        &self,
        body: &OpenPositionRequest,
    ) -> Result<DealReferenceResponse, CapitalError> {
        let resp = self.authenticated_post(POSITIONS, Some(body)).await?;
        parse_json(&resp)
    }


    /// Update stop/limit levels of an open position.
    ///
    /// **Endpoint:** `PUT /positions/{dealId}`
    pub async fn update_position(
        &self,
        deal_id: &str,
        body: &UpdatePositionRequest,
    ) -> Result<DealReferenceResponse, CapitalError> {
        let url = with_segment(POSITION, deal_id);
        let resp = self.authenticated_put(&url, Some(body)).await?;
        parse_json(&resp)
    }


    /// Close a position, fully or partially when `size` is given.
    ///
    /// **Endpoint:** `DELETE /positions/{dealId}`
    pub async fn close_position(
        &self,
        deal_id: &str,
        direction: Direction,
        size: Option<f64>,
    ) -> Result<DealReferenceResponse, CapitalError> {
        let url = with_segment(POSITION, deal_id);
        let body = ClosePositionRequest { direction, size };
        let resp = self.authenticated_delete(&url, Some(&body)).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `GET /workingorders`
    pub async fn get_working_orders(&self) -> Result<GetWorkingOrdersResponse, CapitalError> {
        let resp = self.authenticated_get(WORKING_ORDERS).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `GET /workingorders/{dealId}`
    pub async fn get_working_order(
        &self,
        deal_id: &str,
    ) -> Result<WorkingOrderDetails, CapitalError> {
        let url = with_segment(WORKING_ORDER, deal_id);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Place a limit or stop order.
    ///
    /// **Endpoint:** `POST /workingorders`
    pub async fn create_working_order(
        &self,
        body: &CreateWorkingOrderRequest,
    ) -> Result<DealReferenceResponse, CapitalError> {
        let resp = self.authenticated_post(WORKING_ORDERS, Some(body)).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `PUT /workingorders/{dealId}`
    pub async fn update_working_order(
        &self,
        deal_id: &str,
        body: &UpdateWorkingOrderRequest,
    ) -> Result<DealReferenceResponse, CapitalError> {
        let url = with_segment(WORKING_ORDER, deal_id);
        let resp = self.authenticated_put(&url, Some(body)).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `DELETE /workingorders/{dealId}`
    pub async fn cancel_working_order(
        &self,
        deal_id: &str,
    ) -> Result<DealReferenceResponse, CapitalError> {
        let url = with_segment(WORKING_ORDER, deal_id);
        let resp = self.authenticated_delete::<()>(&url, None).await?;
        parse_json(&resp)
    }


    /// Outcome of a deal placed by any of the calls above.
    ///
    /// **Endpoint:** `GET /confirms/{dealReference}`
    pub async fn get_deal_confirmation(
        &self,
        deal_reference: &str,
    ) -> Result<DealConfirmation, CapitalError> {
        let url = with_segment(GET_CONFIRM, deal_reference);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Account activity (deals, order changes).
    ///
    /// **Endpoint:** `GET /history/activity`
    pub async fn get_activity_history(
        &self,
        params: &ActivityHistoryQuery,
    ) -> Result<ActivityHistoryResponse, CapitalError> {
        let url = with_query(GET_ACTIVITY_HISTORY, params)?;
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Deposits, withdrawals, swaps and trade P&L.
    ///
    /// **Endpoint:** `GET /history/transactions`
    pub async fn get_transaction_history(
        &self,
        params: &TransactionHistoryQuery,
    ) -> Result<TransactionHistoryResponse, CapitalError> {
        let url = with_query(GET_TRANSACTION_HISTORY, params)?;
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }
}
