use fahrtenbuch_auth::{Actor, Operation, check_attachment_access, check_trip_access, resolve};
use fahrtenbuch_core::{AttachmentId, FileType, FleetError, FleetResult, TripAttachment, TripId};
use fahrtenbuch_storage::{Query, RecordReader, RecordWriter, fields};

use super::FleetService;
use crate::views::AttachmentWithUrl;

impl FleetService {
    /// Issues an upload URL. Any caller with a profile may upload.
    pub async fn generate_upload_url(&self, actor: &Actor) -> FleetResult<String> {
        {
            let tx = self.store.begin_read().await?;
            resolve(&*tx, actor).await?;
        }
        Ok(self.blobs.generate_upload_url().await?)
    }

    /// Records an uploaded file on a trip the caller may edit.
    ///
    /// `storage_ref` must have been issued by the blob store.
    pub async fn add_attachment(
        &self,
        actor: &Actor,
        trip_id: &TripId,
        storage_ref: &str,
        file_name: &str,
        file_type: FileType,
    ) -> FleetResult<TripAttachment> {
        if storage_ref.trim().is_empty() {
            return Err(FleetError::validation("storage reference must not be empty"));
        }
        if file_name.trim().is_empty() {
            return Err(FleetError::validation("file name must not be empty"));
        }

        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let trip = check_trip_access(&*tx, &profile, trip_id, Operation::Update).await?;
        if self.blobs.resolve_url(storage_ref).await?.is_none() {
            return Err(FleetError::validation(format!(
                "unknown storage reference '{storage_ref}'"
            )));
        }

        let attachment = TripAttachment::new(trip.id, storage_ref, file_name.trim(), file_type);
        tx.insert_record(&attachment).await?;
        tx.commit().await?;

        tracing::info!(attachment_id = %attachment.id, trip_id = %trip_id, "attachment added");
        Ok(attachment)
    }

    /// Attachments of a trip with their download URLs, oldest first.
    pub async fn list_attachments(
        &self,
        actor: &Actor,
        trip_id: &TripId,
    ) -> FleetResult<Vec<AttachmentWithUrl>> {
        let attachments = {
            let tx = self.store.begin_read().await?;
            let profile = resolve(&*tx, actor).await?;
            check_trip_access(&*tx, &profile, trip_id, Operation::Read).await?;
            tx.find::<TripAttachment>(&Query::by(fields::TRIP_ID, trip_id.as_str()))
                .await?
        };

        let mut result = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            let url = self.blobs.resolve_url(&attachment.storage_ref).await?;
            result.push(AttachmentWithUrl { attachment, url });
        }
        Ok(result)
    }

    /// Removes one attachment from a trip the caller may edit.
    pub async fn delete_attachment(
        &self,
        actor: &Actor,
        attachment_id: &AttachmentId,
    ) -> FleetResult<()> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        check_attachment_access(&*tx, &profile, attachment_id, Operation::Delete).await?;
        tx.delete_record::<TripAttachment>(attachment_id.as_str())
            .await?;
        tx.commit().await?;

        tracing::info!(attachment_id = %attachment_id, "attachment deleted");
        Ok(())
    }
}
