//! High-level sensor interface

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use as608_core::{CommandSpec, Instruction, Param, Session, constants::sizes};
use as608_transport::{FingerDetector, SerialTransport, Transport};
use as608_types::{
    BaudRate, BufferId, PacketSize, ProductInfo, Register, SearchResult, SecurityLevel,
    SystemParameters,
};

use crate::{
    bulk::{BulkTransfer, Progress, ProgressFn},
    config::SensorConfig,
    error::{Error, Result},
    reply::{Reply, ReplyReceiver},
};

/// AS608 fingerprint module
///
/// Operations are blocking and issued one at a time; the sensor owns the
/// transport and the session for the lifetime of the connection.
///
/// # Examples
///
/// ```no_run
/// use as608::Sensor;
///
/// fn main() -> as608::Result<()> {
///     let mut sensor = Sensor::open("/dev/ttyAMA0", 57600)?;
///
///     let params = sensor.connect()?;
///     println!("Capacity: {}", params.capacity);
///
///     let count = sensor.valid_template_count()?;
///     println!("Templates: {}", count);
///     Ok(())
/// }
/// ```
pub struct Sensor {
    transport: Box<dyn Transport>,
    session: Session,
    config: SensorConfig,
    progress: Option<ProgressFn>,
}

impl Sensor {
    /// Create a sensor over any transport with the default configuration
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, SensorConfig::default())
    }

    pub fn with_config(transport: impl Transport + 'static, config: SensorConfig) -> Self {
        Self {
            transport: Box::new(transport),
            session: Session::with_credentials(config.address, config.password),
            config,
            progress: None,
        }
    }

    /// Open a serial port and wrap it
    pub fn open(path: impl Into<String>, baud: u32) -> Result<Self> {
        Ok(Self::new(SerialTransport::open(path, baud)?))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Current module address
    pub fn address(&self) -> u32 {
        self.session.address()
    }

    /// Negotiated bulk chunk size, once known
    pub fn packet_size(&self) -> Option<PacketSize> {
        self.session.packet_size()
    }

    pub fn capacity(&self) -> u16 {
        self.session.capacity()
    }

    pub fn product_info(&self) -> &ProductInfo {
        self.session.product_info()
    }

    /// Observe bulk transfer progress
    pub fn set_progress(&mut self, observer: impl FnMut(Progress) + Send + 'static) {
        self.progress = Some(Box::new(observer));
    }

    pub fn clear_progress(&mut self) {
        self.progress = None;
    }

    // Session

    /// Handshake with the module using the configured credentials
    pub fn connect(&mut self) -> Result<SystemParameters> {
        self.setup(self.config.address, self.config.password)
    }

    /// Reset the session to `address` / `password` and read the parameters
    ///
    /// The password is verified first when one is given. Any failure,
    /// including an unreadable packet size, is reported as `SetupFailed`.
    pub fn setup(&mut self, address: u32, password: Option<u32>) -> Result<SystemParameters> {
        info!("Setting up module at 0x{:08X} on {}...", address, self.transport.description());

        self.session = Session::with_credentials(address, password);

        if let Some(password) = password {
            self.verify_password(password)
                .map_err(|e| Error::SetupFailed(format!("password verification: {}", e)))?;
        }

        let params = self
            .read_sys_params()
            .map_err(|e| Error::SetupFailed(format!("reading system parameters: {}", e)))?;

        info!("Module ready: {}", params);

        Ok(params)
    }

    /// Read system parameters and cache them in the session
    pub fn read_sys_params(&mut self) -> Result<SystemParameters> {
        let reply = self.execute(CommandSpec::new(Instruction::ReadSysPara))?;

        let params = SystemParameters {
            status: reply.u16_at(10)?,
            model: reply.u16_at(12)?,
            capacity: reply.u16_at(14)?,
            security_level: SecurityLevel::new(reply.u16_at(16)?)?,
            address: reply.u32_at(18)?,
            packet_size: PacketSize::from_code(reply.u16_at(22)?)?,
            baud_rate: BaudRate::from_multiplier(reply.u16_at(24)?)?,
        };

        debug!("System parameters: {}", params);
        self.session.apply_system_parameters(&params);

        Ok(params)
    }

    /// Read the FLASH information page and cache the identification strings
    pub fn read_info_page(&mut self) -> Result<ProductInfo> {
        let page = self.upload(Instruction::ReadInfPage, None, sizes::INFO_PAGE)?;

        let info = ProductInfo::from_info_page(&page)?;
        debug!("Product info: {}", info);
        self.session.set_product_info(info.clone());

        Ok(info)
    }

    /// Read system parameters and the information page
    pub fn get_all_info(&mut self) -> Result<(SystemParameters, ProductInfo)> {
        let params = self
            .read_sys_params()
            .map_err(|e| Error::SetupFailed(format!("reading system parameters: {}", e)))?;
        let info = self
            .read_info_page()
            .map_err(|e| Error::SetupFailed(format!("reading info page: {}", e)))?;

        Ok((params, info))
    }

    pub fn verify_password(&mut self, password: u32) -> Result<()> {
        self.execute(CommandSpec::new(Instruction::VfyPwd).param(Param::u32(password)))?;
        self.session.mark_verified();
        debug!("Password verified");
        Ok(())
    }

    /// Set a new handshake password; later handshakes verify it
    pub fn set_password(&mut self, password: u32) -> Result<()> {
        self.execute(CommandSpec::new(Instruction::SetPwd).param(Param::u32(password)))?;
        self.session.set_password(password);
        self.config.password = Some(password);
        info!("Password changed");
        Ok(())
    }

    /// Give the module a new address; later frames use it
    pub fn set_address(&mut self, address: u32) -> Result<()> {
        self.execute(CommandSpec::new(Instruction::SetChipAddr).param(Param::u32(address)))?;
        self.session.set_address(address);
        self.config.address = address;
        info!("Module address set to 0x{:08X}", address);
        Ok(())
    }

    pub fn random_code(&mut self) -> Result<u32> {
        let reply = self.execute(CommandSpec::new(Instruction::GetRandomCode))?;
        reply.u32_at(10)
    }

    // Registers

    /// Write a raw system register (4 = baud, 5 = security level, 6 = packet size)
    pub fn write_reg(&mut self, register: u8, value: u8) -> Result<()> {
        let register = Register::try_from(register).map_err(|_| Error::InvalidRegister(register))?;

        match register {
            Register::BaudRate => {
                let baud = BaudRate::from_multiplier(u16::from(value))?;
                self.set_baud_rate(baud.bps())
            }
            Register::SecurityLevel => self.set_security_level(value),
            Register::PacketSize => {
                let size = PacketSize::from_code(u16::from(value))?;
                self.set_packet_size(size.bytes() as u16)
            }
        }
    }

    /// Change the module's baud rate
    ///
    /// The host side of the link must be switched separately afterwards.
    pub fn set_baud_rate(&mut self, bps: u32) -> Result<()> {
        let baud = BaudRate::from_bps(bps)?;
        self.write_register(Register::BaudRate, baud.multiplier())?;
        self.session.set_baud_rate(baud);
        info!("Module baud rate set to {}", baud.bps());
        Ok(())
    }

    pub fn set_security_level(&mut self, level: u8) -> Result<()> {
        let level = SecurityLevel::new(u16::from(level))?;
        self.write_register(Register::SecurityLevel, level.value())?;
        self.session.set_security_level(level);
        info!("Security level set to {}", level);
        Ok(())
    }

    /// Change the bulk chunk size; only 32, 64, 128 and 256 are valid
    pub fn set_packet_size(&mut self, bytes: u16) -> Result<()> {
        let size = PacketSize::from_bytes(bytes).map_err(|_| Error::InvalidPacketSize(bytes))?;
        self.write_register(Register::PacketSize, size.code())?;
        self.session.set_packet_size(size);
        info!("Packet size set to {}", size.bytes());
        Ok(())
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        debug!("Writing register {:?} = {}", register, value);
        self.execute(
            CommandSpec::new(Instruction::WriteReg)
                .param(Param::byte(register.into()))
                .param(Param::byte(value)),
        )?;
        Ok(())
    }

    // Capture and matching

    /// Capture an image into the image buffer
    pub fn capture_image(&mut self) -> Result<()> {
        self.execute(CommandSpec::new(Instruction::GetImage))?;
        Ok(())
    }

    /// Block until the detector reports a finger
    ///
    /// # Errors
    ///
    /// Returns `NoFinger` if nothing is detected within the finger timeout.
    pub fn wait_finger(&mut self, detector: &mut dyn FingerDetector) -> Result<()> {
        let deadline = Instant::now() + self.config.finger_timeout;

        loop {
            if detector.finger_present()? {
                trace!("Finger detected");
                return Ok(());
            }
            if Instant::now() >= deadline {
                debug!("No finger within {:?}", self.config.finger_timeout);
                return Err(Error::NoFinger);
            }
            thread::sleep(self.config.finger_poll_interval);
        }
    }

    /// Wait for a finger, then capture
    pub fn wait_finger_and_capture(&mut self, detector: &mut dyn FingerDetector) -> Result<()> {
        self.wait_finger(detector)?;
        self.capture_image()
    }

    /// Extract features from the image buffer into `buffer`
    pub fn gen_char(&mut self, buffer: BufferId) -> Result<()> {
        self.execute(CommandSpec::new(Instruction::GenChar).param(Param::byte(buffer.into())))?;
        Ok(())
    }

    /// Compare the two character buffers, returning the score
    pub fn match_buffers(&mut self) -> Result<u16> {
        let reply = self.execute(CommandSpec::new(Instruction::Match))?;
        reply.u16_at(10)
    }

    /// Merge both character buffers into a template
    pub fn reg_model(&mut self) -> Result<()> {
        self.execute(CommandSpec::new(Instruction::RegModel))?;
        Ok(())
    }

    pub fn search(&mut self, buffer: BufferId, start: u16, count: u16) -> Result<SearchResult> {
        self.search_with(Instruction::Search, buffer, start, count)
    }

    pub fn high_speed_search(
        &mut self,
        buffer: BufferId,
        start: u16,
        count: u16,
    ) -> Result<SearchResult> {
        self.search_with(Instruction::HighSpeedSearch, buffer, start, count)
    }

    fn search_with(
        &mut self,
        instruction: Instruction,
        buffer: BufferId,
        start: u16,
        count: u16,
    ) -> Result<SearchResult> {
        let reply = self.execute(
            CommandSpec::new(instruction)
                .param(Param::byte(buffer.into()))
                .param(Param::u16(start))
                .param(Param::u16(count)),
        )?;
        Self::search_result(&reply)
    }

    /// Automatic enrollment run by the module; returns the page used
    pub fn enroll(&mut self) -> Result<u16> {
        let reply = self.execute(CommandSpec::new(Instruction::Enroll))?;
        reply.u16_at(10)
    }

    /// Automatic capture and search run by the module
    pub fn identify(&mut self) -> Result<SearchResult> {
        let reply = self.execute(CommandSpec::new(Instruction::Identify))?;
        Self::search_result(&reply)
    }

    fn search_result(reply: &Reply) -> Result<SearchResult> {
        Ok(SearchResult::new(reply.u16_at(10)?, reply.u16_at(12)?))
    }

    // Library

    /// Store `buffer` into the library at `page`
    pub fn store_char(&mut self, buffer: BufferId, page: u16) -> Result<()> {
        self.execute(
            CommandSpec::new(Instruction::StoreChar)
                .param(Param::byte(buffer.into()))
                .param(Param::u16(page)),
        )?;
        Ok(())
    }

    /// Load the template at `page` into `buffer`
    pub fn load_char(&mut self, buffer: BufferId, page: u16) -> Result<()> {
        self.execute(
            CommandSpec::new(Instruction::LoadChar)
                .param(Param::byte(buffer.into()))
                .param(Param::u16(page)),
        )?;
        Ok(())
    }

    /// Delete `count` templates starting at `start`
    pub fn delete_char(&mut self, start: u16, count: u16) -> Result<()> {
        self.execute(
            CommandSpec::new(Instruction::DeleteChar)
                .param(Param::u16(start))
                .param(Param::u16(count)),
        )?;
        Ok(())
    }

    /// Clear the whole library
    pub fn empty(&mut self) -> Result<()> {
        warn!("Clearing fingerprint library");
        self.execute(CommandSpec::new(Instruction::Empty))?;
        Ok(())
    }

    pub fn valid_template_count(&mut self) -> Result<u16> {
        let reply = self.execute(CommandSpec::new(Instruction::ValidTemplateNum))?;
        reply.u16_at(10)
    }

    /// Occupied library slots, in ascending order
    pub fn index_table(&mut self) -> Result<Vec<u16>> {
        let mut slots = Vec::new();

        for page in 0..sizes::INDEX_PAGES {
            let reply = self.execute(
                CommandSpec::new(Instruction::ReadIndexTable).param(Param::byte(page)),
            )?;
            let bitmap = reply.bytes(10, sizes::INDEX_BITMAP)?;

            let base = usize::from(page) * sizes::INDEX_PAGE_SLOTS;
            for (i, byte) in bitmap.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (1u8 << bit) != 0 {
                        slots.push((base + 8 * i + bit) as u16);
                    }
                }
            }
        }

        debug!("{} occupied slots", slots.len());
        Ok(slots)
    }

    /// Fill `out` with occupied slots, returning how many were written
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if more slots are occupied than `out` holds.
    pub fn read_index_table(&mut self, out: &mut [u16]) -> Result<usize> {
        let slots = self.index_table()?;

        if slots.len() > out.len() {
            return Err(Error::BufferTooSmall {
                needed: slots.len(),
                capacity: out.len(),
            });
        }

        out[..slots.len()].copy_from_slice(&slots);
        Ok(slots.len())
    }

    // Notepad

    /// Write up to 32 bytes to a notepad page; shorter content is zero-padded
    pub fn write_notepad(&mut self, page: u8, content: &[u8]) -> Result<()> {
        if content.len() > sizes::NOTEPAD_PAGE {
            return Err(Error::BufferTooLarge {
                size: content.len(),
                max: sizes::NOTEPAD_PAGE,
            });
        }
        Self::check_notepad_page(page)?;

        let mut data = [0u8; sizes::NOTEPAD_PAGE];
        data[..content.len()].copy_from_slice(content);

        self.execute(
            CommandSpec::new(Instruction::WriteNotepad)
                .param(Param::byte(page))
                .param(Param::buffer(data.to_vec())),
        )?;
        Ok(())
    }

    pub fn read_notepad(&mut self, page: u8) -> Result<[u8; sizes::NOTEPAD_PAGE]> {
        Self::check_notepad_page(page)?;

        let reply =
            self.execute(CommandSpec::new(Instruction::ReadNotepad).param(Param::byte(page)))?;

        let mut data = [0u8; sizes::NOTEPAD_PAGE];
        data.copy_from_slice(reply.bytes(10, sizes::NOTEPAD_PAGE)?);
        Ok(data)
    }

    fn check_notepad_page(page: u8) -> Result<()> {
        if page >= sizes::NOTEPAD_PAGES {
            return Err(Error::Types(as608_types::Error::Validation(format!(
                "notepad page {} not in 0..{}",
                page,
                sizes::NOTEPAD_PAGES
            ))));
        }
        Ok(())
    }

    // Bulk transfers

    /// Upload the template held in `buffer`
    pub fn upload_template(&mut self, buffer: BufferId) -> Result<Vec<u8>> {
        self.upload(Instruction::UpChar, Some(buffer), sizes::TEMPLATE)
    }

    /// Upload the template held in `buffer` and write it to `path`
    pub fn upload_template_to_file(&mut self, buffer: BufferId, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let template = self.upload_template(buffer)?;

        fs::write(path, &template).map_err(|e| Error::file(path, e))?;
        debug!("Template written to {}", path.display());
        Ok(())
    }

    /// Download a 768-byte template into `buffer`
    pub fn download_template(&mut self, buffer: BufferId, data: &[u8]) -> Result<()> {
        if data.len() != sizes::TEMPLATE {
            return Err(Error::TemplateFileSize { actual: data.len() });
        }
        self.download(Instruction::DownChar, Some(buffer), data)
    }

    pub fn download_template_from_file(&mut self, buffer: BufferId, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| Error::file(path, e))?;
        self.download_template(buffer, &data)
    }

    /// Upload the raw image buffer
    pub fn upload_image(&mut self) -> Result<Vec<u8>> {
        self.upload(Instruction::UpImage, None, sizes::IMAGE)
    }

    /// Download a raw image; its length must be a multiple of the packet size
    pub fn download_image(&mut self, data: &[u8]) -> Result<()> {
        self.download(Instruction::DownImage, None, data)
    }

    /// Resynchronize after an interrupted transfer
    ///
    /// Discards pending input and queries the template count until the
    /// module answers.
    pub fn flush(&mut self) -> Result<()> {
        let mut last = Error::Timeout {
            expected: Instruction::ValidTemplateNum.reply_len(),
            received: 0,
        };

        for attempt in 1..=self.config.flush_attempts {
            self.drain()?;

            match self.valid_template_count() {
                Ok(_) => {
                    debug!("Flushed after {} attempt(s)", attempt);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Flush attempt {} failed: {}", attempt, e);
                    last = e;
                }
            }

            if attempt < self.config.flush_attempts {
                thread::sleep(self.config.flush_delay);
            }
        }

        Err(last)
    }

    // Helpers

    fn execute(&mut self, command: CommandSpec) -> Result<Reply> {
        let frame = command.encode(self.session.address())?;

        debug!("Sending {}", command.instruction);
        self.transport.write_all(&frame)?;

        ReplyReceiver::new(
            &mut *self.transport,
            self.config.reply_timeout,
            self.config.poll_interval,
        )
        .receive(command.instruction)
    }

    fn chunk_size(&self) -> Result<usize> {
        self.session
            .packet_size()
            .map(PacketSize::bytes)
            .ok_or_else(|| Error::SetupFailed("packet size not negotiated".into()))
    }

    fn bulk(&mut self, chunk: usize) -> BulkTransfer<'_> {
        BulkTransfer::new(&mut *self.transport, self.session.address(), chunk)
            .with_timing(
                self.config.bulk_idle_timeout,
                self.config.poll_interval,
                self.config.bulk_burst,
            )
            .with_progress(self.progress.as_mut())
    }

    fn command_for(instruction: Instruction, buffer: Option<BufferId>) -> CommandSpec {
        let command = CommandSpec::new(instruction);
        match buffer {
            Some(buffer) => command.param(Param::byte(buffer.into())),
            None => command,
        }
    }

    fn upload(&mut self, instruction: Instruction, buffer: Option<BufferId>, len: usize) -> Result<Vec<u8>> {
        debug_assert!(instruction.has_upload(), "{} sends no data packets", instruction);
        let chunk = self.chunk_size()?;

        self.execute(Self::command_for(instruction, buffer))?;

        let mut data = vec![0u8; len];
        let received = self.bulk(chunk).receive(&mut data)?;
        data.truncate(received);

        debug!("{} uploaded {} bytes", instruction, received);
        Ok(data)
    }

    fn download(&mut self, instruction: Instruction, buffer: Option<BufferId>, data: &[u8]) -> Result<()> {
        debug_assert!(instruction.has_download(), "{} accepts no data packets", instruction);
        let chunk = self.chunk_size()?;
        if data.is_empty() || data.len() % chunk != 0 {
            return Err(Error::SizeMismatch {
                size: data.len(),
                chunk,
            });
        }

        self.execute(Self::command_for(instruction, buffer))?;
        self.bulk(chunk).send(data)?;

        debug!("{} downloaded {} bytes", instruction, data.len());
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        let mut scratch = [0u8; 64];
        let mut discarded = 0;

        while self.transport.bytes_available()? > 0 {
            let n = self.transport.read(&mut scratch)?;
            if n == 0 {
                break;
            }
            discarded += n;
        }

        if discarded > 0 {
            trace!("Discarded {} stale bytes", discarded);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sensor")
            .field("transport", &self.transport.description())
            .field("session", &self.session)
            .finish()
    }
}
