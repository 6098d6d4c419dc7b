use std::future::Future;
use sweephint_core::{BoardGenerator, GenerateRequest, HintAdvisor, HintStep, Observation, SeedGrid};
use sweephint_protocol::{GenerateBoardRequest, GenerateBoardResponse, HintRequest, HintResponse};

use crate::{ClientConfig, ClientError, Result};

/// Board generator backed by `GET <base_url>/genboard`.
#[derive(Clone, Debug)]
pub struct HttpBoardGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpBoardGenerator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(config.build_client()?, config.generate_url()))
    }

    pub fn request(&self, request: GenerateRequest) -> reqwest::RequestBuilder {
        let query = GenerateBoardRequest::from(request).to_query();
        self.client.get(&self.url).query(&query)
    }

    async fn fetch(&self, request: GenerateRequest) -> Result<SeedGrid> {
        log::debug!("Requesting board {:?} from {}", request, self.url);
        let body = self
            .request(request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(GenerateBoardResponse::parse(&body)?.into_seed_grid(request.config.size)?)
    }
}

impl BoardGenerator for HttpBoardGenerator {
    type Error = ClientError;

    fn generate(
        &self,
        request: GenerateRequest,
    ) -> impl Future<Output = Result<SeedGrid>> + Send {
        self.fetch(request)
    }
}

/// Hint advisor backed by `POST <base_url>/hint`.
#[derive(Clone, Debug)]
pub struct HttpHintAdvisor {
    client: reqwest::Client,
    url: String,
}

impl HttpHintAdvisor {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(config.build_client()?, config.hint_url()))
    }

    pub fn request(&self, observation: &Observation) -> reqwest::RequestBuilder {
        self.client
            .post(&self.url)
            .json(&HintRequest::from_observation(observation))
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<Option<Vec<HintStep>>> {
        log::debug!("Requesting hint from {}", self.url);
        let body = request.send().await?.error_for_status()?.text().await?;
        Ok(HintResponse::parse(&body))
    }
}

impl HintAdvisor for HttpHintAdvisor {
    type Error = ClientError;

    fn advise(
        &self,
        observation: &Observation,
    ) -> impl Future<Output = Result<Option<Vec<HintStep>>>> + Send {
        self.fetch(self.request(observation))
    }
}
